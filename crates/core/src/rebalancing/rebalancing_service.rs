//! One-pass pipeline over a portfolio snapshot.

use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::allocation::{
    build_limit_maps, compute_capacities, validate_targets, AllocationDistributor,
};
use crate::errors::Result;
use crate::holdings::{
    sorted_for_liquidation, summarize_by_asset, total_present_value, Holding, HoldingsSummary,
};
use crate::keys::{AccountKey, AssetKey};
use crate::liquidation::LiquidationPlanner;
use crate::rebalancing::{
    apply_reducer_map, AssetClassReducer, PortfolioSnapshot, RebalanceCalculator, RebalanceMap,
    RebalancePlan, ReducerEntry, ReducerMap,
};
use crate::washsale::WashSaleEstimator;

/// Runs the allocation -> rebalance -> reduce -> liquidate -> wash-estimate
/// pipeline for one snapshot and assembles the plan the persistence/display
/// layers consume. Stateless; every pass starts from scratch.
#[derive(Debug, Default, Clone)]
pub struct RebalancingService {
    distributor: AllocationDistributor,
    calculator: RebalanceCalculator,
    reducer: AssetClassReducer,
    planner: LiquidationPlanner,
    estimator: WashSaleEstimator,
}

impl RebalancingService {
    pub fn new() -> Self {
        RebalancingService::default()
    }

    pub fn build_plan(&self, snapshot: &PortfolioSnapshot) -> Result<RebalancePlan> {
        debug!(
            "Building rebalance plan for {} accounts, {} targets, {} holdings",
            snapshot.accounts.len(),
            snapshot.targets.len(),
            snapshot.holdings.len()
        );

        validate_targets(&snapshot.targets)?;
        let capacities = compute_capacities(&snapshot.accounts)?;
        let asset_limits = build_limit_maps(&snapshot.caps, &capacities);

        let allocation = self.distributor.distribute(
            &snapshot.targets,
            &capacities,
            &asset_limits,
            &snapshot.vertical_limits,
            snapshot.settings.flow_mode,
            snapshot.settings.strict,
        )?;

        let holdings_by_account = group_by_account(&snapshot.holdings);
        let empty_allocation = HashMap::new();
        let empty_holdings: Vec<Holding> = Vec::new();

        let mut plan = RebalancePlan {
            allocation,
            ..RebalancePlan::default()
        };

        for account_snapshot in &snapshot.accounts {
            let account = &account_snapshot.account;
            if account_snapshot.restricted {
                // Restricted accounts hold value but are never traded.
                plan.rebalance.insert(account.clone(), RebalanceMap::new());
                plan.reduced.insert(account.clone(), RebalanceMap::new());
                plan.reducers.insert(account.clone(), Vec::new());
                plan.purchases.insert(account.clone(), Vec::new());
                plan.sales.insert(account.clone(), Vec::new());
                plan.sale_wash_estimates.insert(account.clone(), HashMap::new());
                plan.purchase_wash_estimates.insert(account.clone(), HashMap::new());
                continue;
            }
            let account_allocation = plan.allocation.get(account).unwrap_or(&empty_allocation);
            let account_holdings = holdings_by_account
                .get(account)
                .unwrap_or(&empty_holdings);

            let summaries = summarize_by_asset(account_holdings);
            let total = total_present_value(account_holdings);

            let rebalance = self
                .calculator
                .calculate(account_allocation, &summaries, total);

            let ranked_targets = self.rank_related(snapshot, &rebalance);
            let reducer_map = self.reducer.reduce(&rebalance, &ranked_targets, |a, b| {
                compare_by_realized_gain(&summaries, a, b)
            });
            let reduced = apply_reducer_map(&rebalance, &reducer_map, false);

            let purchases = self.planner.purchases(&reduced);
            let holdings_for_sale = lots_by_asset(account_holdings);
            let sales = self.planner.sales(
                &reduced,
                &holdings_for_sale,
                snapshot.settings.minimum_sale_amount,
                snapshot.settings.minimum_position_value,
            );

            let mut sale_estimates = HashMap::new();
            for sale in &sales {
                let wash = self.estimator.sale_wash_amount(
                    sale,
                    &snapshot.trackers,
                    &snapshot.recent_purchases,
                    snapshot.as_of,
                    snapshot.settings.wash_sale_window_days,
                );
                if wash > 0.0 {
                    sale_estimates.insert(sale.asset.clone(), wash);
                }
            }

            let mut purchase_estimates = HashMap::new();
            for purchase in &purchases {
                let wash = self.estimator.purchase_wash_amount(
                    purchase,
                    &snapshot.realized,
                    snapshot.as_of,
                    snapshot.settings.wash_sale_window_days,
                );
                if wash < 0.0 {
                    purchase_estimates.insert(purchase.asset.clone(), wash);
                }
            }

            plan.rebalance.insert(account.clone(), rebalance);
            plan.reduced.insert(account.clone(), reduced);
            plan.reducers
                .insert(account.clone(), sorted_entries(&reducer_map));
            plan.purchases.insert(account.clone(), purchases);
            plan.sales.insert(account.clone(), sales);
            plan.sale_wash_estimates
                .insert(account.clone(), sale_estimates);
            plan.purchase_wash_estimates
                .insert(account.clone(), purchase_estimates);
        }

        Ok(plan)
    }

    /// Related-candidate rankings for every liquidating asset in the map,
    /// restricted to candidates the map is actually buying.
    fn rank_related(
        &self,
        snapshot: &PortfolioSnapshot,
        rebalance: &RebalanceMap,
    ) -> HashMap<AssetKey, Vec<AssetKey>> {
        let mut ranked = HashMap::new();
        for (asset, amount) in rebalance {
            if *amount >= 0.0 {
                continue;
            }
            let candidates: Vec<AssetKey> = snapshot
                .hierarchy
                .ranked_related(asset)
                .into_iter()
                .filter(|candidate| rebalance.get(candidate).copied().unwrap_or(0.0) > 0.0)
                .collect();
            ranked.insert(asset.clone(), candidates);
        }
        ranked
    }
}

/// Ascending realized gain of the liquidating buckets, so loss positions
/// are netted (and thus retained) first.
fn compare_by_realized_gain(
    summaries: &HashMap<AssetKey, HoldingsSummary>,
    a: &AssetKey,
    b: &AssetKey,
) -> Ordering {
    let gain_a = summaries.get(a).map(|s| s.gain_loss()).unwrap_or(0.0);
    let gain_b = summaries.get(b).map(|s| s.gain_loss()).unwrap_or(0.0);
    gain_a.partial_cmp(&gain_b).unwrap_or(Ordering::Equal)
}

fn group_by_account(holdings: &[Holding]) -> HashMap<AccountKey, Vec<Holding>> {
    let mut grouped: HashMap<AccountKey, Vec<Holding>> = HashMap::new();
    for holding in holdings {
        grouped
            .entry(holding.account.clone())
            .or_default()
            .push(holding.clone());
    }
    grouped
}

/// Per-asset lots sorted for liquidation (losses first).
fn lots_by_asset(holdings: &[Holding]) -> HashMap<AssetKey, Vec<Holding>> {
    let mut grouped: HashMap<AssetKey, Vec<Holding>> = HashMap::new();
    for holding in holdings {
        grouped
            .entry(holding.asset.clone())
            .or_default()
            .push(holding.clone());
    }
    grouped
        .into_iter()
        .map(|(asset, lots)| {
            let sorted = sorted_for_liquidation(&lots);
            (asset, sorted)
        })
        .collect()
}

/// Reducer map flattened and ordered for stable output.
fn sorted_entries(reducers: &ReducerMap) -> Vec<ReducerEntry> {
    let mut entries: Vec<ReducerEntry> = reducers
        .iter()
        .map(|(pair, amount)| ReducerEntry {
            liquidating: pair.liquidating.clone(),
            acquiring: pair.acquiring.clone(),
            amount: *amount,
        })
        .collect();
    entries.sort_by(|a, b| {
        a.liquidating
            .cmp(&b.liquidating)
            .then_with(|| a.acquiring.cmp(&b.acquiring))
    });
    entries
}
