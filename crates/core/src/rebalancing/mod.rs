//! Rebalancing module - holdings diffing, related-class netting, and the
//! pipeline service that ties one snapshot pass together.

mod calculator;
mod rebalancing_model;
mod rebalancing_service;
mod reducer;

pub use calculator::RebalanceCalculator;
pub use rebalancing_model::{
    AccountRebalanceMap, PlannerSettings, PortfolioSnapshot, RebalanceMap, RebalancePlan,
    ReducerEntry, ReducerMap, ReducerPair,
};
pub use rebalancing_service::RebalancingService;
pub use reducer::{apply_reducer_map, AssetClassReducer};

#[cfg(test)]
mod calculator_tests;
