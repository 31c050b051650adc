//! folioflow Core - multi-account allocation and rebalance engine.
//!
//! Computes how to move a portfolio toward target asset-class percentages
//! while minimizing taxable events: flow distribution across accounts,
//! holdings diffing, related-class netting, lot selection, and wash-sale
//! estimation. The engine is synchronous and side-effect-free; persistence,
//! import/export, and display are owned by the host application.

pub mod allocation;
pub mod constants;
pub mod errors;
pub mod hierarchy;
pub mod holdings;
pub mod keys;
pub mod liquidation;
pub mod rebalancing;
pub mod washsale;

// Re-export common types
pub use keys::{AccountKey, AssetKey, SecurityKey};
pub use rebalancing::{PlannerSettings, PortfolioSnapshot, RebalancePlan, RebalancingService};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
