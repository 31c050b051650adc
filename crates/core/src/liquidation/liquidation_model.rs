//! Trade-planning domain models.

use serde::{Deserialize, Serialize};

use crate::holdings::Holding;
use crate::keys::AssetKey;

/// A planned buy of one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub asset: AssetKey,
    pub amount: f64,
}

/// A fraction of one holding selected for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidateHolding {
    pub holding: Holding,
    /// The holding's present value at selection time.
    pub present_value: f64,
    /// Fraction of the holding to sell, in (0, 1].
    pub fraction: f64,
}

impl LiquidateHolding {
    pub fn new(holding: Holding, fraction: f64) -> Self {
        let present_value = holding.present_value;
        LiquidateHolding {
            holding,
            present_value,
            fraction,
        }
    }

    pub fn fractional_share_count(&self) -> f64 {
        self.holding.share_count * self.fraction
    }

    pub fn fractional_value(&self) -> f64 {
        self.present_value * self.fraction
    }

    /// Realized gain/loss for the sold fraction; `None` when the lot's
    /// cost basis is unknown.
    pub fn fractional_gain_loss(&self) -> Option<f64> {
        self.holding.gain_loss().map(|g| g * self.fraction)
    }
}

/// A planned sale of one asset class, broken into holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub asset: AssetKey,
    /// Dollar amount the rebalance asked to raise; always positive.
    pub target_amount: f64,
    pub holdings: Vec<LiquidateHolding>,
}

impl Sale {
    /// Total dollar value the planned lots raise. Can exceed
    /// `target_amount` when a residual position was folded in.
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(|h| h.fractional_value()).sum()
    }

    /// Net realized gain/loss across the planned lots; lots with unknown
    /// basis contribute nothing.
    pub fn net_gain_loss(&self) -> f64 {
        self.holdings
            .iter()
            .filter_map(|h| h.fractional_gain_loss())
            .sum()
    }
}
