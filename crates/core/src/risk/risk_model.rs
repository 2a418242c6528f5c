//! Risk metric domain models.

use std::ops::Deref;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Time-ordered simple daily returns (0.012 for +1.2%).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReturnSeries(Vec<Decimal>);

impl ReturnSeries {
    pub fn new(returns: Vec<Decimal>) -> Self {
        Self(returns)
    }

    /// Builds simple returns from a price or value path.
    ///
    /// Each element must be positive; a path of fewer than two values yields
    /// an empty series.
    pub fn from_prices(prices: &[Decimal]) -> Result<Self> {
        if let Some(bad) = prices.iter().find(|p| **p <= Decimal::ZERO) {
            return Err(Error::invalid_input(format!(
                "Prices must be positive to derive returns, got {}",
                bad
            )));
        }

        let returns = prices
            .windows(2)
            .map(|pair| {
                pair[1]
                    .checked_div(pair[0])
                    .map(|growth| growth - Decimal::ONE)
                    .ok_or_else(|| {
                        Error::Calculation(format!(
                            "Return from {} to {} is not representable",
                            pair[0], pair[1]
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(returns))
    }

    pub fn as_slice(&self) -> &[Decimal] {
        &self.0
    }
}

impl Deref for ReturnSeries {
    type Target = [Decimal];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Decimal>> for ReturnSeries {
    fn from(returns: Vec<Decimal>) -> Self {
        Self(returns)
    }
}

/// Peak-to-trough decline of a value path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownInfo {
    /// Largest decline as a non-positive fraction
    pub max_drawdown: Decimal,
    /// Index of the peak preceding the trough (None for an empty path)
    pub peak_index: Option<usize>,
    pub trough_index: Option<usize>,
}

/// Bundle of risk metrics reported for a return series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetrics {
    pub cagr: Decimal,
    pub volatility: Decimal,
    pub sharpe: Decimal,
    pub sortino: Decimal,
    pub max_drawdown: Decimal,
}
