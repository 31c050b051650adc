/// Asset-class key reserved for cash balances; never traded by the planner.
pub const CASH_ASSET_KEY: &str = "cash";

/// Prefix for currency-qualified cash keys ("$cash:usd").
pub const CASH_ASSET_PREFIX: &str = "$cash";

/// Epsilon for fraction and percentage comparisons.
pub const FRACTION_EPSILON: f64 = 1e-4;

/// Epsilon for dollar-amount comparisons.
pub const AMOUNT_EPSILON: f64 = 0.001;

/// Rebalance diffs at or below this never become trades.
pub const MINIMUM_TRADE_AMOUNT: f64 = 0.01;

/// Near-zero cutoff used when applying a reducer map.
pub const REDUCER_EPSILON: f64 = 1e-4;

/// Default lookback window for wash-sale estimation, in days.
pub const DEFAULT_WASH_SALE_WINDOW_DAYS: i64 = 30;
