//! Allocation module - capacity computation, limit maps, and the flow
//! distributor.

mod allocation_errors;
mod allocation_model;
mod distributor;

pub use allocation_errors::AllocationError;
pub use allocation_model::{
    build_limit_maps, compute_capacities, validate_targets, AccountAssetValueMap,
    AccountCapacity, AccountSnapshot, AssetValue, AssetValueMap, Cap, LimitMap,
};
pub use distributor::AllocationDistributor;
