//! Wash-sale module - estimating disallowed-loss exposure around planned
//! trades.

mod estimator;
mod washsale_model;

pub use estimator::WashSaleEstimator;
pub use washsale_model::{PurchaseInfo, RealizedTransaction, TrackerGroups};

#[cfg(test)]
mod estimator_tests;
