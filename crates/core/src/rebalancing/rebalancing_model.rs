//! Rebalancing domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::allocation::{AccountAssetValueMap, AccountSnapshot, AssetValue, Cap, LimitMap};
use crate::constants::DEFAULT_WASH_SALE_WINDOW_DAYS;
use crate::errors::Result;
use crate::hierarchy::AssetTree;
use crate::holdings::Holding;
use crate::keys::{AccountKey, AssetKey};
use crate::liquidation::{Purchase, Sale};
use crate::washsale::{PurchaseInfo, RealizedTransaction, TrackerGroups};

/// asset -> signed dollar delta (positive = buy, negative = sell). Cash is
/// never present.
pub type RebalanceMap = HashMap<AssetKey, f64>;

/// account -> RebalanceMap.
pub type AccountRebalanceMap = HashMap<AccountKey, RebalanceMap>;

/// Ordered (liquidating, acquiring) asset-class pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducerPair {
    pub liquidating: AssetKey,
    pub acquiring: AssetKey,
}

/// ReducerPair -> transferred dollar amount.
pub type ReducerMap = HashMap<ReducerPair, f64>;

/// Flattened, serializable reducer record for the output surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReducerEntry {
    pub liquidating: AssetKey,
    pub acquiring: AssetKey,
    pub amount: f64,
}

/// Tunables for one pipeline pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSettings {
    /// 0.0 = every account mirrors the targets, 1.0 = fill priority
    /// accounts first.
    pub flow_mode: f64,
    /// Abort instead of clamping when an allocation exceeds a user cap.
    pub strict: bool,
    /// Sales below this dollar amount are not worth placing.
    pub minimum_sale_amount: f64,
    /// Residual positions at or below this are liquidated fully.
    pub minimum_position_value: f64,
    /// Lookback window for wash-sale estimation.
    pub wash_sale_window_days: i64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        PlannerSettings {
            flow_mode: 0.0,
            strict: false,
            minimum_sale_amount: 100.0,
            minimum_position_value: 250.0,
            wash_sale_window_days: DEFAULT_WASH_SALE_WINDOW_DAYS,
        }
    }
}

/// Immutable input snapshot for one recomputation pass. Built fresh by the
/// caller whenever any input changes; the engine never mutates it.
#[derive(Debug, Clone)]
pub struct PortfolioSnapshot {
    /// Accounts in priority order.
    pub accounts: Vec<AccountSnapshot>,
    /// Strategy targets in priority order, summing to 1.
    pub targets: Vec<AssetValue>,
    /// User ceilings per (account, asset).
    pub caps: Vec<Cap>,
    /// Pre-normalized vertical limits, account -> asset, in global-fraction
    /// units.
    pub vertical_limits: LimitMap,
    /// All position lots across accounts.
    pub holdings: Vec<Holding>,
    /// Asset-class hierarchy for related-class substitution.
    pub hierarchy: AssetTree,
    /// Tracker-equivalent security groupings.
    pub trackers: TrackerGroups,
    /// Purchases inside the recent lookback window.
    pub recent_purchases: Vec<PurchaseInfo>,
    /// Realized sells inside the recent lookback window.
    pub realized: Vec<RealizedTransaction>,
    /// Snapshot date; anchors the wash-sale window.
    pub as_of: NaiveDate,
    pub settings: PlannerSettings,
}

/// Everything one pipeline pass produces, keyed the way the persistence and
/// display layers consume it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebalancePlan {
    /// account -> asset -> fraction of the account's capacity.
    pub allocation: AccountAssetValueMap,
    /// Raw dollar diffs before related-class netting.
    pub rebalance: AccountRebalanceMap,
    /// Dollar diffs after applying the reducer maps.
    pub reduced: AccountRebalanceMap,
    /// Netting decisions per account.
    pub reducers: HashMap<AccountKey, Vec<ReducerEntry>>,
    /// Planned purchases per account, largest first.
    pub purchases: HashMap<AccountKey, Vec<Purchase>>,
    /// Planned sales per account with lot detail.
    pub sales: HashMap<AccountKey, Vec<Sale>>,
    /// Estimated disallowed-loss exposure per sold asset class.
    pub sale_wash_estimates: HashMap<AccountKey, HashMap<AssetKey, f64>>,
    /// Estimated retroactive wash exposure per purchased asset class.
    pub purchase_wash_estimates: HashMap<AccountKey, HashMap<AssetKey, f64>>,
}

impl RebalancePlan {
    /// Serializes the plan for export to the persistence/UI layers.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
