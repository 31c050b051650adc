//! Allocation domain models and input preparation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::FRACTION_EPSILON;
use crate::errors::{Result, ValidationError};
use crate::keys::{AccountKey, AssetKey};

/// One target slice of a strategy: asset class and its fraction of the
/// whole portfolio. A strategy's slices must sum to 1 within epsilon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetValue {
    pub asset: AssetKey,
    pub target_fraction: f64,
}

/// An account's share of the total allocatable present value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountCapacity {
    pub account: AccountKey,
    pub capacity: f64,
}

/// Read-only account row from the snapshot. Restricted accounts hold value
/// but never receive new allocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    pub account: AccountKey,
    pub present_value: f64,
    #[serde(default)]
    pub restricted: bool,
}

/// User ceiling on how much of an account may go to an asset class, as a
/// fraction of the account. Absence of a cap implies 1.0 (no limit).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Cap {
    pub account: AccountKey,
    pub asset: AssetKey,
    pub limit_pct: f64,
}

/// asset -> fraction (of an account's capacity, or of the portfolio,
/// depending on context).
pub type AssetValueMap = HashMap<AssetKey, f64>;

/// account -> asset -> fraction.
pub type AccountAssetValueMap = HashMap<AccountKey, AssetValueMap>;

/// account -> asset -> limit in global-fraction units.
pub type LimitMap = HashMap<AccountKey, HashMap<AssetKey, f64>>;

/// Checks that a strategy's slices are valid keys with fractions in [0, 1]
/// summing to 1 within epsilon.
pub fn validate_targets(targets: &[AssetValue]) -> Result<()> {
    let mut sum = 0.0;
    for target in targets {
        if !target.asset.is_valid() {
            return Err(ValidationError::MissingField("asset key".to_string()).into());
        }
        if !(-FRACTION_EPSILON..=1.0 + FRACTION_EPSILON).contains(&target.target_fraction) {
            return Err(ValidationError::InvalidInput(format!(
                "Target fraction {} for '{}' is outside [0, 1]",
                target.target_fraction, target.asset
            ))
            .into());
        }
        sum += target.target_fraction;
    }
    if (sum - 1.0).abs() > FRACTION_EPSILON {
        return Err(ValidationError::TargetSumMismatch(sum).into());
    }
    Ok(())
}

/// Computes each account's capacity as its share of the total allocatable
/// (unrestricted) present value, preserving the snapshot's account order.
///
/// Restricted accounts always get capacity 0. When the unrestricted total
/// is not positive every capacity is 0; a combined (restricted plus
/// unrestricted) total that is not positive is inconsistent caller data and
/// fails instead.
pub fn compute_capacities(accounts: &[AccountSnapshot]) -> Result<Vec<AccountCapacity>> {
    let combined: f64 = accounts.iter().map(|a| a.present_value).sum();
    if combined <= 0.0 {
        return Err(ValidationError::NonPositivePortfolio(combined).into());
    }

    let allocatable: f64 = accounts
        .iter()
        .filter(|a| !a.restricted)
        .map(|a| a.present_value)
        .sum();

    Ok(accounts
        .iter()
        .map(|a| AccountCapacity {
            account: a.account.clone(),
            capacity: if a.restricted || allocatable <= 0.0 {
                0.0
            } else {
                a.present_value / allocatable
            },
        })
        .collect())
}

/// Converts user caps into the per-account horizontal limit maps the
/// distributor consumes, in global-fraction units (`limit_pct * capacity`).
///
/// Every account in `capacities` gets an entry, so a missing-limit failure
/// can only come from accounts the caller never declared.
pub fn build_limit_maps(caps: &[Cap], capacities: &[AccountCapacity]) -> LimitMap {
    let mut limits: LimitMap = capacities
        .iter()
        .map(|c| (c.account.clone(), HashMap::new()))
        .collect();

    for cap in caps {
        let Some(capacity) = capacities.iter().find(|c| c.account == cap.account) else {
            continue;
        };
        limits
            .entry(cap.account.clone())
            .or_default()
            .insert(cap.asset.clone(), cap.limit_pct.clamp(0.0, 1.0) * capacity.capacity);
    }

    limits
}
