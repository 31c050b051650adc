//! Wash-sale exposure estimation.
//!
//! This is a planning aid, not tax filing: amounts are approximations that
//! cap the disallowed loss by both the size of the loss and the size of the
//! replacement purchases inside the lookback window.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

use crate::keys::SecurityKey;
use crate::liquidation::{Purchase, Sale};
use crate::washsale::{PurchaseInfo, RealizedTransaction, TrackerGroups};

/// Stateless estimator over the snapshot's recent-transaction window.
#[derive(Debug, Default, Clone)]
pub struct WashSaleEstimator {}

impl WashSaleEstimator {
    pub fn new() -> Self {
        WashSaleEstimator {}
    }

    /// Estimated disallowed loss for a planned sale, as a non-negative
    /// magnitude.
    ///
    /// Only sales realizing a net loss are exposed. The replacement basis
    /// is the total of recent purchases of any security tracker-equivalent
    /// to a sold lot's security; the result is capped by both that basis
    /// and the size of the loss.
    pub fn sale_wash_amount(
        &self,
        sale: &Sale,
        trackers: &TrackerGroups,
        recent_purchases: &[PurchaseInfo],
        as_of: NaiveDate,
        window_days: i64,
    ) -> f64 {
        let net_gain_loss = sale.net_gain_loss();
        if net_gain_loss >= 0.0 {
            return 0.0;
        }

        let mut equivalents: HashSet<SecurityKey> = HashSet::new();
        for lot in &sale.holdings {
            equivalents.extend(trackers.equivalents(&lot.holding.security));
        }

        let window_start = as_of - Duration::days(window_days);
        let purchases_basis: f64 = recent_purchases
            .iter()
            .filter(|p| {
                p.purchased_at >= window_start
                    && p.purchased_at <= as_of
                    && equivalents.contains(&p.security)
            })
            .map(|p| p.basis_value())
            .sum();

        // Disallowed amount is capped by the loss and by the replacement
        // purchases.
        -((-purchases_basis).max(net_gain_loss))
    }

    /// Estimated retroactive wash exposure of a planned purchase, as a
    /// non-positive amount.
    ///
    /// Sums realized gains/losses over actual sales (negative share count)
    /// of the same asset class inside the window; a net realized loss up
    /// to the purchase amount would be disallowed by buying back in.
    pub fn purchase_wash_amount(
        &self,
        purchase: &Purchase,
        realized: &[RealizedTransaction],
        as_of: NaiveDate,
        window_days: i64,
    ) -> f64 {
        let window_start = as_of - Duration::days(window_days);
        let total_realized: f64 = realized
            .iter()
            .filter(|t| {
                t.asset == purchase.asset
                    && t.share_count < 0.0
                    && t.traded_at >= window_start
                    && t.traded_at <= as_of
            })
            .map(|t| t.realized_gain_loss())
            .sum();

        total_realized.max(-purchase.amount).min(0.0)
    }
}
