use log::debug;
use rust_decimal::Decimal;

use crate::config::SizingConfig;
use crate::errors::{Error, Result};

use super::sizing_model::SizingRecommendation;

/// Kelly fraction for a binary bet: `p - (1 - p) / b`.
///
/// A negative result means the bet should not be taken. Callers clamp it
/// before display; `recommended_fraction` does so itself.
pub fn kelly_fraction(win_probability: Decimal, win_loss_ratio: Decimal) -> Result<Decimal> {
    if win_probability < Decimal::ZERO || win_probability > Decimal::ONE {
        return Err(Error::invalid_input(format!(
            "Win probability must be within [0, 1], got {}",
            win_probability
        )));
    }
    if win_loss_ratio <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "Win/loss ratio must be positive, got {}",
            win_loss_ratio
        )));
    }

    let loss_probability = Decimal::ONE - win_probability;
    loss_probability
        .checked_div(win_loss_ratio)
        .map(|penalty| win_probability - penalty)
        .ok_or_else(|| {
            Error::Calculation(format!(
                "Kelly fraction overflowed for ratio {}",
                win_loss_ratio
            ))
        })
}

/// Discounted Kelly fraction clamped to `[0, hard_cap_fraction]`.
pub fn recommended_fraction(kelly: Decimal, config: &SizingConfig) -> Decimal {
    let cap = config.hard_cap_fraction.max(Decimal::ZERO);
    (kelly.max(Decimal::ZERO) * config.discount_factor)
        .max(Decimal::ZERO)
        .min(cap)
}

/// Currency amount for a Kelly fraction. Never exceeds
/// `hard_cap_fraction * bankroll`; an empty or negative bankroll yields zero.
pub fn recommended_size(kelly: Decimal, bankroll: Decimal, config: &SizingConfig) -> Decimal {
    if bankroll <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    recommended_fraction(kelly, config) * bankroll
}

impl SizingRecommendation {
    pub fn compute(
        win_probability: Decimal,
        win_loss_ratio: Decimal,
        bankroll: Decimal,
        config: &SizingConfig,
    ) -> Result<Self> {
        let kelly = kelly_fraction(win_probability, win_loss_ratio)?;
        let fraction = recommended_fraction(kelly, config);
        let amount = recommended_size(kelly, bankroll, config);

        debug!(
            "Sizing p={} b={}: kelly {} -> fraction {} of {}",
            win_probability, win_loss_ratio, kelly, fraction, bankroll
        );

        Ok(Self {
            kelly_fraction: kelly,
            recommended_fraction: fraction,
            recommended_amount: amount,
        })
    }
}
