//! Holdings module - lot-level positions and per-bucket summaries.

mod holdings_model;

pub use holdings_model::{
    sorted_for_liquidation, summarize_by_asset, total_present_value, Holding, HoldingsSummary,
};

#[cfg(test)]
mod holdings_model_tests;
