//! Portfolio domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BASE_CURRENCY;
use crate::errors::{Error, Result};

/// Closed set of asset classes. Unrecognized labels map to `Other`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetClass {
    EquityDomestic,
    EquityForeign,
    Crypto,
    MoneyMarket,
    Commodity,
    #[default]
    Other,
}

impl AssetClass {
    /// Every variant, in canonical order.
    pub const ALL: [AssetClass; 6] = [
        AssetClass::EquityDomestic,
        AssetClass::EquityForeign,
        AssetClass::Crypto,
        AssetClass::MoneyMarket,
        AssetClass::Commodity,
        AssetClass::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetClass::EquityDomestic => "EQUITY_DOMESTIC",
            AssetClass::EquityForeign => "EQUITY_FOREIGN",
            AssetClass::Crypto => "CRYPTO",
            AssetClass::MoneyMarket => "MONEY_MARKET",
            AssetClass::Commodity => "COMMODITY",
            AssetClass::Other => "OTHER",
        }
    }

    /// Lenient label parsing. Never fails: unknown labels become `Other`.
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "equity_domestic" | "id_stocks" | "idx_stocks" | "stock" | "stocks" => {
                AssetClass::EquityDomestic
            }
            "equity_foreign" | "us_stocks" | "foreign_stocks" => AssetClass::EquityForeign,
            "crypto" | "cryptocurrency" => AssetClass::Crypto,
            "money_market" | "emergency_fund" | "ef" | "cash" | "mmf" => AssetClass::MoneyMarket,
            "commodity" | "commodities" | "gold" => AssetClass::Commodity,
            _ => AssetClass::Other,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(AssetClass::from_label(s))
    }
}

/// A single holding on a single venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub ticker: String,
    pub asset_class: AssetClass,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    /// Average cost per unit
    #[serde(with = "rust_decimal::serde::str")]
    pub cost_basis: Decimal,
    /// Last known price per unit, possibly stale
    #[serde(with = "rust_decimal::serde::str")]
    pub last_price: Decimal,
    pub venue: String,
    /// Per-position drift threshold, overrides class and global thresholds
    #[serde(
        default,
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub drift_threshold: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Position {
    pub fn market_value(&self) -> Decimal {
        self.quantity * self.last_price
    }

    /// Total amount paid for the position.
    pub fn cost_value(&self) -> Decimal {
        self.quantity * self.cost_basis
    }

    pub fn unrealized_pnl(&self) -> Decimal {
        self.market_value() - self.cost_value()
    }

    /// Unrealized P&L as a percentage of cost. None when nothing was paid or
    /// the percentage is not representable.
    pub fn unrealized_pnl_percent(&self) -> Option<Decimal> {
        let cost = self.cost_value();
        if cost.is_zero() {
            return None;
        }
        self.unrealized_pnl()
            .checked_div(cost)?
            .checked_mul(Decimal::ONE_HUNDRED)
    }

    pub(crate) fn matches(&self, ticker: &str, venue: Option<&str>) -> bool {
        self.ticker == ticker && venue.map_or(true, |v| self.venue == v)
    }
}

/// Input model for adding a position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPosition {
    pub ticker: String,
    pub asset_class: AssetClass,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub venue: String,
}

impl NewPosition {
    pub fn new(
        ticker: impl Into<String>,
        asset_class: AssetClass,
        quantity: Decimal,
        cost_basis: Decimal,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            asset_class,
            quantity,
            cost_basis,
            venue: venue.into(),
        }
    }
}

/// Holdings, cash and base currency. This is the persisted shape of a
/// portfolio; `PortfolioStore` enforces its invariants.
///
/// Amounts are written as decimal strings so snapshots keep full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    #[serde(default)]
    pub positions: Vec<Position>,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub cash: Decimal,
    pub base_currency: String,
    /// Permits a negative cash balance
    #[serde(default)]
    pub allow_margin: bool,
}

impl Portfolio {
    pub fn new(base_currency: impl Into<String>) -> Self {
        Self {
            positions: Vec::new(),
            cash: Decimal::ZERO,
            base_currency: base_currency.into().trim().to_uppercase(),
            allow_margin: false,
        }
    }
}

impl Default for Portfolio {
    fn default() -> Self {
        Portfolio::new(DEFAULT_BASE_CURRENCY)
    }
}

/// Trims and upper-cases a ticker, rejecting malformed symbols.
///
/// A valid ticker is 1-20 characters, starts with an ASCII letter or digit
/// and otherwise contains only letters, digits, `_`, `-` or `.`.
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    let mut chars = ticker.chars();

    let valid_head = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let valid_tail = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if !valid_head || !valid_tail || ticker.len() > 20 {
        return Err(Error::invalid_input(format!(
            "Invalid ticker format: '{}'. Must be 1-20 alphanumeric characters",
            ticker
        )));
    }
    Ok(ticker)
}

/// Trims and lower-cases a venue label.
pub fn normalize_venue(venue: &str) -> String {
    venue.trim().to_lowercase()
}
