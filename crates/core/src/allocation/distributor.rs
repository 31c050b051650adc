//! Flow distribution of target fractions across an ordered set of accounts.

use log::{debug, error};
use std::collections::HashMap;

use crate::allocation::allocation_model::{
    AccountAssetValueMap, AccountCapacity, AssetValue, LimitMap,
};
use crate::allocation::AllocationError;
use crate::constants::FRACTION_EPSILON;
use crate::errors::Result;
use crate::keys::AssetKey;

/// Distributes a strategy's target fractions across accounts.
///
/// Accounts are processed in priority order and within each account the
/// target assets are processed in priority order; earlier accounts consume
/// the shared per-asset remaining capacity first. `flow_mode` interpolates
/// between every account mirroring the target allocation independently
/// (0.0) and filling priority accounts to their caps before touching later
/// ones (1.0). All working state is local to one call.
#[derive(Debug, Default, Clone)]
pub struct AllocationDistributor {}

impl AllocationDistributor {
    pub fn new() -> Self {
        AllocationDistributor {}
    }

    /// Produces account -> (asset -> allocated fraction of that account's
    /// capacity).
    ///
    /// `asset_limits` are horizontal limits and `vertical_limits` vertical
    /// limits, both keyed account -> asset in global-fraction units; a
    /// missing account entry in either map fails with
    /// [`AllocationError::MissingLimit`]. Under `strict`, exceeding a
    /// horizontal limit aborts instead of clamping.
    pub fn distribute(
        &self,
        targets: &[AssetValue],
        capacities: &[AccountCapacity],
        asset_limits: &LimitMap,
        vertical_limits: &LimitMap,
        flow_mode: f64,
        strict: bool,
    ) -> Result<AccountAssetValueMap> {
        debug!(
            "Distributing {} targets across {} accounts (flow_mode={}, strict={})",
            targets.len(),
            capacities.len(),
            flow_mode,
            strict
        );

        let skew = 1.0 - (1.0 - flow_mode.clamp(0.0, 1.0)).powi(2);
        let mut remaining_asset_capacity: Vec<f64> =
            targets.iter().map(|t| t.target_fraction).collect();
        let mut result: AccountAssetValueMap = HashMap::new();

        for (account_index, account) in capacities.iter().enumerate() {
            let mut fractions = HashMap::new();
            if account.capacity <= FRACTION_EPSILON {
                result.insert(account.account.clone(), fractions);
                continue;
            }

            let account_verticals = vertical_limits
                .get(&account.account)
                .ok_or_else(|| AllocationError::MissingLimit {
                    account: account.account.clone(),
                })?;

            let mut remaining_in_account = account.capacity;

            for (asset_index, target) in targets.iter().enumerate() {
                let remaining_asset = remaining_asset_capacity[asset_index];
                if remaining_asset <= FRACTION_EPSILON {
                    continue;
                }

                // Reserved so later, lower-priority assets aren't starved.
                let forward_asset_capacity: f64 =
                    remaining_asset_capacity[asset_index + 1..].iter().sum();

                // Reserved so later accounts still get their share of this
                // asset.
                let mut forward_asset_limit = 0.0;
                for later in &capacities[account_index + 1..] {
                    forward_asset_limit +=
                        horizontal_limit(asset_limits, later, &target.asset)?;
                }

                let mirror_target = target.target_fraction * account.capacity;
                let flow_target =
                    mirror_target + (target.target_fraction - mirror_target) * skew;

                let user_asset_limit = horizontal_limit(asset_limits, account, &target.asset)?;
                let surplus_required =
                    (remaining_asset - forward_asset_limit - flow_target).max(0.0);
                let user_max_limit = account
                    .capacity
                    .min(user_asset_limit.min(flow_target) + surplus_required);
                let user_vertical_limit = account_verticals
                    .get(&target.asset)
                    .copied()
                    .unwrap_or(0.0);

                let hard_ceiling = remaining_in_account.min(remaining_asset);
                let hard_floor = (remaining_in_account - forward_asset_capacity).max(0.0);
                let desired = user_max_limit.max(user_vertical_limit);

                let allocated = hard_ceiling.min(hard_floor.max(desired));

                if allocated < -FRACTION_EPSILON {
                    error!(
                        "Distribution invariant violated: {} for '{}' in account '{}'",
                        allocated, target.asset, account.account
                    );
                    return Err(AllocationError::NegativeAllocation {
                        account: account.account.clone(),
                        asset: target.asset.clone(),
                        value: allocated,
                    }
                    .into());
                }
                if strict && allocated > user_asset_limit + FRACTION_EPSILON {
                    return Err(AllocationError::LimitExceeded {
                        account: account.account.clone(),
                        asset: target.asset.clone(),
                        allocated,
                        limit: user_asset_limit,
                    }
                    .into());
                }

                let allocated = allocated.max(0.0);
                remaining_in_account -= allocated;
                remaining_asset_capacity[asset_index] -= allocated;
                fractions.insert(target.asset.clone(), allocated / account.capacity);
            }

            result.insert(account.account.clone(), fractions);
        }

        Ok(result)
    }
}

/// Horizontal limit for (account, asset) in global-fraction units. A missing
/// per-asset entry means no user cap, i.e. the whole account capacity; a
/// missing account map is a configuration error.
fn horizontal_limit(
    asset_limits: &LimitMap,
    account: &AccountCapacity,
    asset: &AssetKey,
) -> std::result::Result<f64, AllocationError> {
    let account_map: &HashMap<AssetKey, f64> =
        asset_limits
            .get(&account.account)
            .ok_or_else(|| AllocationError::MissingLimit {
                account: account.account.clone(),
            })?;
    Ok(account_map.get(asset).copied().unwrap_or(account.capacity))
}
