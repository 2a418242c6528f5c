use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Trading days per year used to annualize daily figures
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// Default annual risk-free rate
pub const DEFAULT_RISK_FREE_ANNUAL: Decimal = dec!(0.05);

/// Default Kelly discount (half-Kelly)
pub const DEFAULT_KELLY_DISCOUNT: Decimal = dec!(0.5);

/// Default hard cap on a single recommended position, as a bankroll fraction
pub const DEFAULT_HARD_CAP_FRACTION: Decimal = dec!(0.10);

/// Default absolute drift threshold that triggers a rebalance
pub const DEFAULT_DRIFT_THRESHOLD: Decimal = dec!(0.05);

/// Months of coverage required before leaving the foundation phase
pub const DEFAULT_TARGET_MONTHS: u32 = 6;

/// Tolerance used when checking that weights sum to one
pub const WEIGHT_TOLERANCE: Decimal = dec!(0.000001);

/// Largest value a single holding or the cash balance may carry, so portfolio
/// totals stay inside the Decimal range
pub const MAX_HOLDING_VALUE: Decimal = dec!(100000000000000000000);

/// Decimal precision for reported figures
pub const DECIMAL_PRECISION: u32 = 6;

/// Base currency used when a snapshot does not name one
pub const DEFAULT_BASE_CURRENCY: &str = "IDR";
