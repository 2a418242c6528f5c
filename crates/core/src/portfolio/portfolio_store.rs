use std::collections::{BTreeMap, HashSet};

use chrono::Utc;
use log::{debug, warn};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::constants::MAX_HOLDING_VALUE;
use crate::errors::{Error, Result};

use super::portfolio_model::{
    normalize_ticker, normalize_venue, AssetClass, NewPosition, Portfolio, Position,
};

/// Authoritative in-memory holdings with valuation and weight queries.
///
/// The store performs no I/O. Prices are handed to it by the caller and
/// persistence is delegated to a snapshot repository.
#[derive(Debug, Clone, Default)]
pub struct PortfolioStore {
    portfolio: Portfolio,
}

impl PortfolioStore {
    pub fn new(base_currency: impl Into<String>) -> Self {
        Self {
            portfolio: Portfolio::new(base_currency),
        }
    }

    /// Adopts a loaded portfolio after checking every invariant.
    pub fn from_portfolio(mut portfolio: Portfolio) -> Result<Self> {
        if portfolio.cash < Decimal::ZERO && !portfolio.allow_margin {
            return Err(Error::invalid_input(format!(
                "Negative cash balance {} requires margin to be enabled",
                portfolio.cash
            )));
        }
        check_cash_range(portfolio.cash)?;

        for position in portfolio.positions.iter_mut() {
            position.ticker = normalize_ticker(&position.ticker)?;
            position.venue = normalize_venue(&position.venue);
        }

        let mut seen = HashSet::new();
        for position in &portfolio.positions {
            check_non_negative("quantity", position.quantity)?;
            check_non_negative("cost basis", position.cost_basis)?;
            check_non_negative("price", position.last_price)?;
            if let Some(threshold) = position.drift_threshold {
                check_non_negative("drift threshold", threshold)?;
            }
            check_holding_value(&position.ticker, position.quantity, position.last_price)?;
            check_holding_value(&position.ticker, position.quantity, position.cost_basis)?;
            if !seen.insert((position.ticker.as_str(), position.venue.as_str())) {
                return Err(Error::DuplicateTicker {
                    ticker: position.ticker.clone(),
                    venue: position.venue.clone(),
                });
            }
        }

        Ok(Self { portfolio })
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    pub fn into_portfolio(self) -> Portfolio {
        self.portfolio
    }

    pub fn positions(&self) -> &[Position] {
        &self.portfolio.positions
    }

    pub fn base_currency(&self) -> &str {
        &self.portfolio.base_currency
    }

    pub fn cash(&self) -> Decimal {
        self.portfolio.cash
    }

    pub fn set_allow_margin(&mut self, allow: bool) {
        self.portfolio.allow_margin = allow;
    }

    pub fn set_cash(&mut self, cash: Decimal) -> Result<()> {
        if cash < Decimal::ZERO && !self.portfolio.allow_margin {
            return Err(Error::invalid_input(format!(
                "Cash balance cannot be negative without margin: {}",
                cash
            )));
        }
        check_cash_range(cash)?;
        self.portfolio.cash = cash;
        Ok(())
    }

    /// Inserts a new holding. The same ticker may be held on several venues,
    /// but only once per venue.
    pub fn add_position(&mut self, new_position: NewPosition) -> Result<Position> {
        let ticker = normalize_ticker(&new_position.ticker)?;
        let venue = normalize_venue(&new_position.venue);
        check_non_negative("quantity", new_position.quantity)?;
        check_non_negative("cost basis", new_position.cost_basis)?;
        check_holding_value(&ticker, new_position.quantity, new_position.cost_basis)?;

        if self
            .portfolio
            .positions
            .iter()
            .any(|p| p.matches(&ticker, Some(&venue)))
        {
            return Err(Error::DuplicateTicker { ticker, venue });
        }

        let position = Position {
            id: Uuid::new_v4().to_string(),
            ticker,
            asset_class: new_position.asset_class,
            quantity: new_position.quantity,
            cost_basis: new_position.cost_basis,
            last_price: new_position.cost_basis,
            venue,
            drift_threshold: None,
            last_updated: None,
        };

        debug!(
            "Added position {} on {} ({} units)",
            position.ticker, position.venue, position.quantity
        );
        self.portfolio.positions.push(position.clone());
        Ok(position)
    }

    /// Finds a holding by ticker, optionally restricted to one venue.
    pub fn get_position(&self, ticker: &str, venue: Option<&str>) -> Option<&Position> {
        let ticker = ticker.trim().to_uppercase();
        let venue = venue.map(normalize_venue);
        self.portfolio
            .positions
            .iter()
            .find(|p| p.matches(&ticker, venue.as_deref()))
    }

    /// Sets the last known price on every venue holding `ticker`.
    pub fn update_price(&mut self, ticker: &str, price: Decimal) -> Result<()> {
        check_non_negative("price", price)?;
        let ticker = ticker.trim().to_uppercase();
        for position in self.portfolio.positions.iter().filter(|p| p.ticker == ticker) {
            check_holding_value(&ticker, position.quantity, price)?;
        }
        let now = Utc::now();

        let mut updated = 0;
        for position in self
            .portfolio
            .positions
            .iter_mut()
            .filter(|p| p.ticker == ticker)
        {
            position.last_price = price;
            position.last_updated = Some(now);
            updated += 1;
        }

        if updated == 0 {
            return Err(Error::NotFound(ticker));
        }
        debug!("Updated price of {} to {} on {} venue(s)", ticker, price, updated);
        Ok(())
    }

    /// Changes quantity and/or average cost of an existing holding.
    pub fn update_position(
        &mut self,
        ticker: &str,
        venue: Option<&str>,
        quantity: Option<Decimal>,
        cost_basis: Option<Decimal>,
    ) -> Result<Position> {
        if let Some(quantity) = quantity {
            check_non_negative("quantity", quantity)?;
        }
        if let Some(cost_basis) = cost_basis {
            check_non_negative("cost basis", cost_basis)?;
        }

        let position = self.position_mut(ticker, venue)?;
        let new_quantity = quantity.unwrap_or(position.quantity);
        check_holding_value(&position.ticker, new_quantity, position.last_price)?;
        check_holding_value(
            &position.ticker,
            new_quantity,
            cost_basis.unwrap_or(position.cost_basis),
        )?;

        if let Some(quantity) = quantity {
            position.quantity = quantity;
        }
        if let Some(cost_basis) = cost_basis {
            position.cost_basis = cost_basis;
        }
        Ok(position.clone())
    }

    /// Sets or clears the per-position drift threshold override.
    pub fn set_drift_threshold(
        &mut self,
        ticker: &str,
        venue: Option<&str>,
        threshold: Option<Decimal>,
    ) -> Result<()> {
        if let Some(threshold) = threshold {
            check_non_negative("drift threshold", threshold)?;
        }
        self.position_mut(ticker, venue)?.drift_threshold = threshold;
        Ok(())
    }

    /// Removes every venue holding of `ticker` and returns what was removed.
    pub fn remove_position(&mut self, ticker: &str) -> Result<Vec<Position>> {
        self.remove_matching(ticker, None)
    }

    /// Removes the holding of `ticker` on a single venue.
    pub fn remove_position_on_venue(&mut self, ticker: &str, venue: &str) -> Result<Position> {
        let mut removed = self.remove_matching(ticker, Some(venue))?;
        // (ticker, venue) is unique, so exactly one holding matched
        Ok(removed.remove(0))
    }

    fn remove_matching(&mut self, ticker: &str, venue: Option<&str>) -> Result<Vec<Position>> {
        let ticker = ticker.trim().to_uppercase();
        let venue = venue.map(normalize_venue);

        let (removed, kept): (Vec<Position>, Vec<Position>) = self
            .portfolio
            .positions
            .drain(..)
            .partition(|p| p.matches(&ticker, venue.as_deref()));
        self.portfolio.positions = kept;

        if removed.is_empty() {
            return Err(Error::NotFound(ticker));
        }
        debug!("Removed {} holding(s) of {}", removed.len(), ticker);
        Ok(removed)
    }

    fn position_mut(&mut self, ticker: &str, venue: Option<&str>) -> Result<&mut Position> {
        let ticker = ticker.trim().to_uppercase();
        let venue = venue.map(normalize_venue);
        self.portfolio
            .positions
            .iter_mut()
            .find(|p| p.matches(&ticker, venue.as_deref()))
            .ok_or(Error::NotFound(ticker))
    }

    // === Valuation ===

    /// Market value of all holdings, excluding cash.
    pub fn positions_value(&self) -> Decimal {
        self.portfolio
            .positions
            .iter()
            .map(Position::market_value)
            .sum()
    }

    /// Market value of all holdings plus cash. Zero for an empty portfolio.
    pub fn total_value(&self) -> Decimal {
        self.positions_value() + self.portfolio.cash
    }

    pub fn total_cost_basis(&self) -> Decimal {
        self.portfolio
            .positions
            .iter()
            .map(Position::cost_value)
            .sum()
    }

    pub fn total_unrealized_pnl(&self) -> Decimal {
        self.positions_value() - self.total_cost_basis()
    }

    /// Market value per asset class. Cash is counted as money market.
    pub fn class_values(&self) -> BTreeMap<AssetClass, Decimal> {
        let mut values: BTreeMap<AssetClass, Decimal> =
            AssetClass::ALL.iter().map(|c| (*c, Decimal::ZERO)).collect();

        for position in &self.portfolio.positions {
            *values.entry(position.asset_class).or_default() += position.market_value();
        }
        *values.entry(AssetClass::MoneyMarket).or_default() += self.portfolio.cash;
        values
    }

    /// Weight of each asset class in the total portfolio value.
    ///
    /// Every class is present in the result. The weights sum to one whenever
    /// the total value is positive; otherwise every weight is zero.
    pub fn weights_by_class(&self) -> BTreeMap<AssetClass, Decimal> {
        let total = self.total_value();
        let values = self.class_values();

        if total <= Decimal::ZERO {
            return values.into_keys().map(|c| (c, Decimal::ZERO)).collect();
        }

        values
            .into_iter()
            .map(|(class, value)| (class, weight_of(value, total)))
            .collect()
    }

    /// Weight of each venue in the value of the holdings (cash excluded).
    pub fn weights_by_venue(&self) -> BTreeMap<String, Decimal> {
        let total = self.positions_value();
        if total <= Decimal::ZERO {
            return BTreeMap::new();
        }

        let mut weights: BTreeMap<String, Decimal> = BTreeMap::new();
        for position in &self.portfolio.positions {
            *weights.entry(position.venue.clone()).or_default() += position.market_value() / total;
        }
        weights
    }

    /// Weight of one ticker, summed across venues. Zero when the portfolio has
    /// no value.
    pub fn position_weight(&self, ticker: &str) -> Result<Decimal> {
        let ticker = ticker.trim().to_uppercase();
        let holdings: Vec<&Position> = self
            .portfolio
            .positions
            .iter()
            .filter(|p| p.ticker == ticker)
            .collect();

        if holdings.is_empty() {
            return Err(Error::NotFound(ticker));
        }

        let total = self.total_value();
        if total <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }
        Ok(weight_of(
            holdings.iter().map(|p| p.market_value()).sum(),
            total,
        ))
    }
}

/// `value / total`, or zero with a warning when a margin balance shrinks the
/// total so far that the weight is not representable.
pub(crate) fn weight_of(value: Decimal, total: Decimal) -> Decimal {
    value.checked_div(total).unwrap_or_else(|| {
        warn!("Weight of {} in a total of {} is not representable", value, total);
        Decimal::ZERO
    })
}

/// Keeps `quantity * price` at or below `MAX_HOLDING_VALUE`.
fn check_holding_value(ticker: &str, quantity: Decimal, price: Decimal) -> Result<()> {
    match quantity.checked_mul(price) {
        Some(value) if value <= MAX_HOLDING_VALUE => Ok(()),
        _ => Err(Error::invalid_input(format!(
            "Value of {} ({} x {}) exceeds the supported maximum of {}",
            ticker, quantity, price, MAX_HOLDING_VALUE
        ))),
    }
}

fn check_cash_range(cash: Decimal) -> Result<()> {
    if cash.abs() > MAX_HOLDING_VALUE {
        return Err(Error::invalid_input(format!(
            "Cash balance {} exceeds the supported maximum of {}",
            cash, MAX_HOLDING_VALUE
        )));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(Error::invalid_input(format!(
            "{} cannot be negative: {}",
            field, value
        )));
    }
    Ok(())
}
