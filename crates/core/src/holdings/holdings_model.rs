//! Holdings domain models.
//!
//! A [`Holding`] is one lot-bearing position row as supplied by the host
//! application (import/persistence layers). The engine never mutates
//! holdings; it aggregates them into [`HoldingsSummary`] buckets and selects
//! fractions of them for liquidation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::keys::{AccountKey, AssetKey, SecurityKey};

/// One position lot in one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub account: AccountKey,
    pub asset: AssetKey,
    pub security: SecurityKey,
    pub share_count: f64,
    pub present_value: f64,
    /// Unknown when the lot was imported without acquisition data.
    pub cost_basis: Option<f64>,
}

impl Holding {
    /// Unrealized gain/loss; `None` when the cost basis is unknown.
    pub fn gain_loss(&self) -> Option<f64> {
        self.cost_basis.map(|basis| self.present_value - basis)
    }
}

/// Aggregated (presentValue, costBasis, count) for one (account, asset) or
/// (asset) bucket.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSummary {
    pub present_value: f64,
    pub cost_basis: f64,
    pub count: usize,
}

impl HoldingsSummary {
    pub fn gain_loss(&self) -> f64 {
        self.present_value - self.cost_basis
    }

    /// Folds one holding into the bucket. A lot with unknown basis
    /// contributes its present value as basis, i.e. zero gain.
    pub fn add(&mut self, holding: &Holding) {
        self.present_value += holding.present_value;
        self.cost_basis += holding.cost_basis.unwrap_or(holding.present_value);
        self.count += 1;
    }
}

/// Aggregates holdings into per-asset summary buckets.
pub fn summarize_by_asset(holdings: &[Holding]) -> HashMap<AssetKey, HoldingsSummary> {
    let mut summaries: HashMap<AssetKey, HoldingsSummary> = HashMap::new();
    for holding in holdings {
        summaries
            .entry(holding.asset.clone())
            .or_default()
            .add(holding);
    }
    summaries
}

/// Total present value across holdings.
pub fn total_present_value(holdings: &[Holding]) -> f64 {
    holdings.iter().map(|h| h.present_value).sum()
}

/// Sorts holdings ascending by unrealized gain/loss so that losses are
/// consumed first during liquidation. Lots with unknown basis sort as zero
/// gain; ties break on the lot id for determinism.
pub fn sorted_for_liquidation(holdings: &[Holding]) -> Vec<Holding> {
    let mut sorted: Vec<Holding> = holdings.to_vec();
    sorted.sort_by(|a, b| {
        let ga = a.gain_loss().unwrap_or(0.0);
        let gb = b.gain_loss().unwrap_or(0.0);
        ga.partial_cmp(&gb)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    sorted
}
