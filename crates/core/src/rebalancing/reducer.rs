//! Netting of planned sales against planned purchases of related asset
//! classes.
//!
//! Selling one class to immediately rebuy a close relative nets to nothing
//! economically but still creates tax events and trading costs, so such
//! pairs are cancelled against each other. Distinct, independently-targeted
//! classes are never netted; only candidates ranked related by the
//! hierarchy qualify.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::constants::REDUCER_EPSILON;
use crate::keys::AssetKey;
use crate::rebalancing::{RebalanceMap, ReducerMap, ReducerPair};

/// Stateless reducer over one account's rebalance map.
#[derive(Debug, Default, Clone)]
pub struct AssetClassReducer {}

impl AssetClassReducer {
    pub fn new() -> Self {
        AssetClassReducer {}
    }

    /// Produces the netting map for one account.
    ///
    /// `ranked_targets` maps each asset to its related candidates, nearest
    /// first. `order_by` fixes the processing sequence of liquidating
    /// assets (callers rank by ascending realized gain so low-basis lots
    /// are preserved first); ties fall back to key order so the result is
    /// deterministic.
    pub fn reduce<F>(
        &self,
        rebalance: &RebalanceMap,
        ranked_targets: &HashMap<AssetKey, Vec<AssetKey>>,
        mut order_by: F,
    ) -> ReducerMap
    where
        F: FnMut(&AssetKey, &AssetKey) -> Ordering,
    {
        let mut working = rebalance.clone();
        let mut reducers = ReducerMap::new();

        let mut liquidating: Vec<AssetKey> = working
            .iter()
            .filter(|(_, amount)| **amount < 0.0)
            .map(|(asset, _)| asset.clone())
            .collect();
        liquidating.sort_by(|a, b| order_by(a, b).then_with(|| a.cmp(b)));

        for seller in liquidating {
            let Some(candidates) = ranked_targets.get(&seller) else {
                continue;
            };

            for candidate in candidates {
                let remaining = working.get(&seller).copied().unwrap_or(0.0);
                if remaining >= -REDUCER_EPSILON {
                    break;
                }
                let available = working.get(candidate).copied().unwrap_or(0.0);
                if available <= REDUCER_EPSILON {
                    continue;
                }

                let transfer = available.min(-remaining);
                *working.entry(seller.clone()).or_insert(0.0) += transfer;
                *working.entry(candidate.clone()).or_insert(0.0) -= transfer;
                *reducers
                    .entry(ReducerPair {
                        liquidating: seller.clone(),
                        acquiring: candidate.clone(),
                    })
                    .or_insert(0.0) += transfer;
            }
        }

        reducers
    }
}

/// Applies a reducer map to a rebalance map: per pair, the transferred
/// amount is added back to the liquidating entry and taken from the
/// acquiring entry. Near-zero results are dropped unless `preserve_zero`
/// is set (zero-value cells still render in a display grid).
pub fn apply_reducer_map(
    base: &RebalanceMap,
    reducers: &ReducerMap,
    preserve_zero: bool,
) -> RebalanceMap {
    let mut applied = base.clone();

    for (pair, amount) in reducers {
        *applied.entry(pair.liquidating.clone()).or_insert(0.0) += amount;
        *applied.entry(pair.acquiring.clone()).or_insert(0.0) -= amount;
    }

    if !preserve_zero {
        applied.retain(|_, amount| amount.abs() > REDUCER_EPSILON);
    }

    applied
}
