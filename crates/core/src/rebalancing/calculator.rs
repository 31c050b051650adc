//! Diffs target allocation against current holdings for one account.

use log::debug;
use std::collections::HashMap;

use crate::constants::AMOUNT_EPSILON;
use crate::holdings::HoldingsSummary;
use crate::keys::AssetKey;
use crate::rebalancing::RebalanceMap;

/// Stateless calculator turning (allocation, holdings) into signed dollar
/// deltas per asset class.
#[derive(Debug, Default, Clone)]
pub struct RebalanceCalculator {}

impl RebalanceCalculator {
    pub fn new() -> Self {
        RebalanceCalculator {}
    }

    /// Computes the rebalance map for one account.
    ///
    /// `allocation` holds fractions of the account's capacity;
    /// `total_present_value` is the account's total holdings value, so
    /// `fraction * total` is the target dollar amount. Held assets missing
    /// from the allocation (orphans) are fully liquidated. Cash is excluded
    /// on both sides, and diffs within epsilon of zero are dropped.
    pub fn calculate(
        &self,
        allocation: &HashMap<AssetKey, f64>,
        holdings: &HashMap<AssetKey, HoldingsSummary>,
        total_present_value: f64,
    ) -> RebalanceMap {
        let mut diffs = RebalanceMap::new();

        for (asset, fraction) in allocation {
            if asset.is_cash() {
                continue;
            }
            let current = holdings.get(asset).map(|s| s.present_value).unwrap_or(0.0);
            let diff = fraction * total_present_value - current;
            if diff.abs() > AMOUNT_EPSILON {
                diffs.insert(asset.clone(), diff);
            }
        }

        for (asset, summary) in holdings {
            if asset.is_cash() || allocation.contains_key(asset) {
                continue;
            }
            let diff = 0.0 - summary.present_value;
            if diff.abs() > AMOUNT_EPSILON {
                debug!("Orphan asset '{}' marked for full liquidation", asset);
                diffs.insert(asset.clone(), diff);
            }
        }

        diffs
    }
}
