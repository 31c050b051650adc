//! Asset-class hierarchy module - arena tree, related-class ranking, rollup.

mod hierarchy_model;
mod rollup;

pub use hierarchy_model::{AssetNode, AssetTree};
pub use rollup::{rollup, RollupResult};
