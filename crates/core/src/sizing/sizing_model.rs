use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade-size recommendation derived from a win-rate/odds estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingRecommendation {
    /// Raw Kelly fraction, negative when the bet has no edge
    pub kelly_fraction: Decimal,
    /// Discounted and capped bankroll fraction, in [0, hard cap]
    pub recommended_fraction: Decimal,
    /// Currency amount to commit
    pub recommended_amount: Decimal,
}
