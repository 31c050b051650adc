use thiserror::Error;

use crate::keys::{AccountKey, AssetKey};

/// Errors raised while distributing target fractions across accounts.
///
/// All of these abort the whole distribution for the strategy; none are
/// retried, since re-running with the same input cannot succeed.
#[derive(Error, Debug)]
pub enum AllocationError {
    /// A required per-account limit map entry is absent.
    #[error("No limit entries for account '{account}'")]
    MissingLimit { account: AccountKey },

    /// Strict mode: the computed allocation exceeds a user-set asset limit.
    #[error(
        "Allocation {allocated:.6} for '{asset}' in account '{account}' exceeds user limit {limit:.6}"
    )]
    LimitExceeded {
        account: AccountKey,
        asset: AssetKey,
        allocated: f64,
        limit: f64,
    },

    /// Internal invariant violated: the algorithm produced a negative
    /// allocation beyond epsilon tolerance. A defect, not bad input.
    #[error("Negative allocation {value:.6} computed for '{asset}' in account '{account}'")]
    NegativeAllocation {
        account: AccountKey,
        asset: AssetKey,
        value: f64,
    },
}
