//! Selection of holdings to satisfy sell amounts, losses first.

use log::warn;
use std::collections::HashMap;

use crate::constants::{AMOUNT_EPSILON, MINIMUM_TRADE_AMOUNT};
use crate::holdings::Holding;
use crate::keys::AssetKey;
use crate::liquidation::{LiquidateHolding, Purchase, Sale};
use crate::rebalancing::RebalanceMap;

/// Stateless planner turning a reduced rebalance map into trade lists.
#[derive(Debug, Default, Clone)]
pub struct LiquidationPlanner {}

impl LiquidationPlanner {
    pub fn new() -> Self {
        LiquidationPlanner {}
    }

    /// Planned buys: positive diffs above the trade minimum, ignoring cash,
    /// largest first.
    pub fn purchases(&self, rebalance: &RebalanceMap) -> Vec<Purchase> {
        let mut purchases: Vec<Purchase> = rebalance
            .iter()
            .filter(|(asset, amount)| !asset.is_cash() && **amount > MINIMUM_TRADE_AMOUNT)
            .map(|(asset, amount)| Purchase {
                asset: asset.clone(),
                amount: *amount,
            })
            .collect();
        purchases.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.asset.cmp(&b.asset))
        });
        purchases
    }

    /// Planned sales: negative diffs at or above `minimum_sale_amount`,
    /// ignoring cash.
    ///
    /// `holdings_by_asset` must hold each asset's lots pre-sorted ascending
    /// by unrealized gain/loss (see `holdings::sorted_for_liquidation`), so
    /// losses are realized before gains. Selling down to a residual at or
    /// below `minimum_position_value` liquidates the lot fully instead of
    /// leaving dust. An asset with no usable holdings yields no Sale.
    pub fn sales(
        &self,
        rebalance: &RebalanceMap,
        holdings_by_asset: &HashMap<AssetKey, Vec<Holding>>,
        minimum_sale_amount: f64,
        minimum_position_value: f64,
    ) -> Vec<Sale> {
        let mut sales = Vec::new();

        for (asset, diff) in rebalance {
            if asset.is_cash() || *diff >= -MINIMUM_TRADE_AMOUNT {
                continue;
            }
            let target_amount = -diff;
            if target_amount < minimum_sale_amount {
                continue;
            }

            let Some(asset_holdings) = holdings_by_asset.get(asset) else {
                warn!("No holdings available to sell for asset '{}'", asset);
                continue;
            };

            let mut remaining = target_amount;
            let mut lots = Vec::new();
            for holding in asset_holdings {
                if remaining <= AMOUNT_EPSILON {
                    break;
                }
                if holding.present_value <= 0.0 {
                    continue;
                }

                let mut amount = remaining.min(holding.present_value);
                if holding.present_value - amount <= minimum_position_value {
                    amount = holding.present_value;
                }
                let fraction = (amount / holding.present_value).min(1.0);

                remaining -= amount;
                lots.push(LiquidateHolding::new(holding.clone(), fraction));
            }

            if lots.is_empty() {
                warn!("No holdings available to sell for asset '{}'", asset);
                continue;
            }

            sales.push(Sale {
                asset: asset.clone(),
                target_amount,
                holdings: lots,
            });
        }

        sales.sort_by(|a, b| {
            b.target_amount
                .partial_cmp(&a.target_amount)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.asset.cmp(&b.asset))
        });
        sales
    }
}
