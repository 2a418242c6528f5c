//! Pure numeric transforms of a return series.
//!
//! Every function is deterministic and reentrant. Degenerate input (empty or
//! single-element series, zero volatility) resolves to zero rather than an
//! error, so callers always receive a finite value.

use log::warn;
use rust_decimal::{Decimal, MathematicalOps};

use crate::config::RiskConfig;
use crate::constants::DECIMAL_PRECISION;
use crate::errors::{Error, Result};

use super::risk_model::{DrawdownInfo, RiskMetrics};

/// Compound annual growth rate: `(end / begin)^(1 / years) - 1`.
///
/// An end value of zero is a total loss and yields -1.
pub fn cagr(begin_value: Decimal, end_value: Decimal, years: Decimal) -> Result<Decimal> {
    if begin_value <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "CAGR begin value must be positive, got {}",
            begin_value
        )));
    }
    if years <= Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "CAGR period must be positive, got {} years",
            years
        )));
    }
    if end_value < Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "CAGR end value cannot be negative, got {}",
            end_value
        )));
    }
    if end_value.is_zero() {
        return Ok(Decimal::NEGATIVE_ONE);
    }

    let growth = end_value
        .checked_div(begin_value)
        .ok_or_else(|| Error::Calculation("CAGR growth ratio overflowed".to_string()))?;
    let exponent = Decimal::ONE
        .checked_div(years)
        .ok_or_else(|| Error::Calculation("CAGR exponent overflowed".to_string()))?;

    match growth.checked_powd(exponent) {
        Some(compounded) => Ok(compounded - Decimal::ONE),
        None => {
            warn!(
                "CAGR could not raise {} to the power {} ({} years)",
                growth, exponent, years
            );
            Err(Error::Calculation(format!(
                "CAGR growth {} over {} years is not representable",
                growth, years
            )))
        }
    }
}

/// Arithmetic mean daily return scaled to a year. Zero for an empty series.
pub fn mean_annual_return(series: &[Decimal], config: &RiskConfig) -> Decimal {
    if series.is_empty() {
        return Decimal::ZERO;
    }
    mean(series)
        .and_then(|m| m.checked_mul(Decimal::from(config.trading_days_per_year)))
        .unwrap_or_else(|| overflowed("Mean annual return"))
}

/// Sample standard deviation of daily returns scaled by the square root of
/// the trading days per year. Zero for fewer than two observations.
pub fn annualized_volatility(series: &[Decimal], config: &RiskConfig) -> Decimal {
    if series.len() < 2 {
        return Decimal::ZERO;
    }

    sample_variance(series)
        .and_then(|variance| variance.sqrt())
        .and_then(|daily| daily.checked_mul(annualization_factor(config)))
        .unwrap_or_else(|| overflowed("Volatility"))
}

/// Excess annual return per unit of annualized volatility.
///
/// Defined as zero when volatility is zero, including every series shorter
/// than two observations.
pub fn sharpe_ratio(series: &[Decimal], config: &RiskConfig) -> Decimal {
    if series.len() < 2 {
        return Decimal::ZERO;
    }

    let volatility = annualized_volatility(series, config);
    excess_over(series, volatility, config, "Sharpe")
}

/// Root-mean-square shortfall below `target_daily_return`, annualized.
///
/// Returns at or above the target contribute zero. The mean is taken over the
/// whole series.
pub fn downside_deviation(
    series: &[Decimal],
    target_daily_return: Decimal,
    config: &RiskConfig,
) -> Decimal {
    if series.is_empty() {
        return Decimal::ZERO;
    }

    series
        .iter()
        .try_fold(Decimal::ZERO, |acc, &r| {
            let shortfall = r.checked_sub(target_daily_return)?.min(Decimal::ZERO);
            acc.checked_add(shortfall.checked_mul(shortfall)?)
        })
        .and_then(|sum| sum.checked_div(Decimal::from(series.len())))
        .and_then(|mean_square| mean_square.sqrt())
        .and_then(|daily| daily.checked_mul(annualization_factor(config)))
        .unwrap_or_else(|| overflowed("Downside deviation"))
}

/// Excess annual return per unit of downside deviation.
///
/// The downside target is the risk-free rate spread linearly over the trading
/// year (`risk_free_annual / trading_days_per_year`), matching the arithmetic
/// annualization of the mean return in the numerator.
///
/// Defined as zero when downside deviation is zero or the series has fewer
/// than two observations.
pub fn sortino_ratio(series: &[Decimal], config: &RiskConfig) -> Decimal {
    if series.len() < 2 {
        return Decimal::ZERO;
    }

    let target_daily = config
        .risk_free_annual
        .checked_div(Decimal::from(config.trading_days_per_year))
        .unwrap_or(Decimal::ZERO);
    let downside = downside_deviation(series, target_daily, config);
    excess_over(series, downside, config, "Sortino")
}

/// Largest peak-to-trough decline of the value path obtained by compounding
/// `series` from a base of 1.
///
/// The result is never positive. A path that never falls below a prior peak
/// yields zero. Returns below -100% floor the path at zero, and a path that
/// leaves the Decimal range saturates at `Decimal::MAX`.
pub fn max_drawdown(series: &[Decimal]) -> Decimal {
    let mut value = Decimal::ONE;
    let mut peak = Decimal::ONE;
    let mut worst = Decimal::ZERO;

    for &daily_return in series {
        // only a positive return can overflow here
        let growth = Decimal::ONE
            .checked_add(daily_return)
            .unwrap_or(Decimal::MAX)
            .max(Decimal::ZERO);
        value = value.checked_mul(growth).unwrap_or(Decimal::MAX);
        peak = peak.max(value);

        // 0 <= value <= peak and peak >= 1
        let drawdown = (value - peak) / peak;
        worst = worst.min(drawdown);
    }

    worst
}

/// Maximum drawdown of an absolute value path, with the peak and trough
/// positions that produced it.
pub fn drawdown_details(values: &[Decimal]) -> DrawdownInfo {
    let Some(&first) = values.first() else {
        return DrawdownInfo {
            max_drawdown: Decimal::ZERO,
            peak_index: None,
            trough_index: None,
        };
    };

    let mut running_peak = first;
    let mut running_peak_index = 0;
    let mut info = DrawdownInfo {
        max_drawdown: Decimal::ZERO,
        peak_index: Some(0),
        trough_index: Some(0),
    };

    for (index, &value) in values.iter().enumerate() {
        if value > running_peak {
            running_peak = value;
            running_peak_index = index;
        }

        if running_peak <= Decimal::ZERO {
            continue;
        }

        let Some(drawdown) = value
            .checked_sub(running_peak)
            .and_then(|decline| decline.checked_div(running_peak))
        else {
            warn!(
                "Drawdown from {} to {} is not representable, skipping index {}",
                running_peak, value, index
            );
            continue;
        };
        if drawdown < info.max_drawdown {
            info.max_drawdown = drawdown;
            info.peak_index = Some(running_peak_index);
            info.trough_index = Some(index);
        }
    }

    info
}

impl RiskMetrics {
    /// Computes the full metric bundle for a series whose value grew from
    /// `begin_value` to `end_value` over `years`.
    pub fn compute(
        series: &[Decimal],
        begin_value: Decimal,
        end_value: Decimal,
        years: Decimal,
        config: &RiskConfig,
    ) -> Result<Self> {
        Ok(Self {
            cagr: cagr(begin_value, end_value, years)?.round_dp(DECIMAL_PRECISION),
            volatility: annualized_volatility(series, config).round_dp(DECIMAL_PRECISION),
            sharpe: sharpe_ratio(series, config).round_dp(DECIMAL_PRECISION),
            sortino: sortino_ratio(series, config).round_dp(DECIMAL_PRECISION),
            max_drawdown: max_drawdown(series).round_dp(DECIMAL_PRECISION),
        })
    }
}

fn mean(series: &[Decimal]) -> Option<Decimal> {
    series
        .iter()
        .try_fold(Decimal::ZERO, |acc, &r| acc.checked_add(r))?
        .checked_div(Decimal::from(series.len()))
}

/// Sum of squared deviations from the mean over `n - 1`.
fn sample_variance(series: &[Decimal]) -> Option<Decimal> {
    let mean = mean(series)?;
    series
        .iter()
        .try_fold(Decimal::ZERO, |acc, &r| {
            let diff = r.checked_sub(mean)?;
            acc.checked_add(diff.checked_mul(diff)?)
        })?
        .checked_div(Decimal::from(series.len() - 1))
}

fn annualization_factor(config: &RiskConfig) -> Decimal {
    Decimal::from(config.trading_days_per_year)
        .sqrt()
        .unwrap_or(Decimal::ZERO)
}

fn overflowed(metric: &str) -> Decimal {
    warn!("{} overflowed the Decimal range, falling back to zero", metric);
    Decimal::ZERO
}

/// `(mean annual return - risk free) / risk`, zero when risk is zero.
fn excess_over(series: &[Decimal], risk: Decimal, config: &RiskConfig, label: &str) -> Decimal {
    if risk.is_zero() {
        return Decimal::ZERO;
    }

    mean_annual_return(series, config)
        .checked_sub(config.risk_free_annual)
        .and_then(|excess| excess.checked_div(risk))
        .unwrap_or_else(|| {
            warn!("{} ratio overflowed (risk {})", label, risk);
            Decimal::ZERO
        })
}
