//! Emergency-fund phase domain models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PhaseConfig;
use crate::errors::{Error, Result};

/// Operating phase of the savings plan, ordered by emergency-fund adequacy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Building the emergency fund
    #[default]
    Phase1Foundation,
    /// Emergency fund complete, savings go to investments
    Phase2Accumulation,
}

impl Phase {
    pub fn number(&self) -> u8 {
        match self {
            Phase::Phase1Foundation => 1,
            Phase::Phase2Accumulation => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Phase1Foundation => "Foundation",
            Phase::Phase2Accumulation => "Accumulation",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {} ({})", self.number(), self.label())
    }
}

/// Snapshot of monthly expenses and the liquid balance backing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundState {
    pub monthly_fixed_expenses: Decimal,
    pub monthly_variable_expenses: Decimal,
    /// Income-volatility multiplier applied to the fund target (>= 1)
    pub volatility_multiplier: Decimal,
    pub current_balance: Decimal,
}

impl EmergencyFundState {
    pub fn new(
        monthly_fixed_expenses: Decimal,
        monthly_variable_expenses: Decimal,
        volatility_multiplier: Decimal,
        current_balance: Decimal,
    ) -> Self {
        Self {
            monthly_fixed_expenses,
            monthly_variable_expenses,
            volatility_multiplier,
            current_balance,
        }
    }

    /// Checks every field: expenses, multiplier and balance.
    pub fn validate(&self) -> Result<()> {
        self.check_expenses()?;
        if self.volatility_multiplier < Decimal::ONE {
            return Err(Error::invalid_input(format!(
                "Volatility multiplier must be at least 1, got {}",
                self.volatility_multiplier
            )));
        }
        if self.current_balance < Decimal::ZERO {
            return Err(Error::invalid_input(format!(
                "Emergency fund balance cannot be negative, got {}",
                self.current_balance
            )));
        }
        Ok(())
    }

    fn check_expenses(&self) -> Result<()> {
        if self.monthly_fixed_expenses < Decimal::ZERO
            || self.monthly_variable_expenses < Decimal::ZERO
        {
            return Err(Error::invalid_input(
                "Monthly expenses cannot be negative".to_string(),
            ));
        }
        if self.monthly_expenses() <= Decimal::ZERO {
            return Err(Error::invalid_input(
                "Monthly expenses must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn monthly_expenses(&self) -> Decimal {
        self.monthly_fixed_expenses + self.monthly_variable_expenses
    }

    /// `(fixed * fixedExpenseMonths + variable * variableExpenseMonths) * multiplier`
    pub fn fund_target(&self, config: &PhaseConfig) -> Decimal {
        (self.monthly_fixed_expenses * Decimal::from(config.fixed_expense_months)
            + self.monthly_variable_expenses * Decimal::from(config.variable_expense_months))
            * self.volatility_multiplier
    }

    /// Months of total expenses the current balance covers. Only the
    /// expenses are checked; they must be positive.
    pub fn coverage_months(&self) -> Result<Decimal> {
        self.check_expenses()?;
        self.current_balance
            .checked_div(self.monthly_expenses())
            .ok_or_else(|| {
                Error::Calculation(format!(
                    "Coverage of {} over {} monthly expenses is not representable",
                    self.current_balance,
                    self.monthly_expenses()
                ))
            })
    }

    pub fn amount_remaining(&self, config: &PhaseConfig) -> Decimal {
        (self.fund_target(config) - self.current_balance).max(Decimal::ZERO)
    }

    /// Progress toward the fund target in percent, capped at 100.
    pub fn progress_percent(&self, config: &PhaseConfig) -> Decimal {
        let target = self.fund_target(config);
        if target <= Decimal::ZERO {
            return Decimal::ONE_HUNDRED;
        }
        (self.current_balance / target * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
    }

    pub fn is_complete(&self, config: &PhaseConfig) -> bool {
        self.current_balance >= self.fund_target(config)
    }

    /// Even monthly contribution that closes the gap in `months_to_goal`.
    /// Zero when no months are given.
    pub fn monthly_contribution_needed(&self, months_to_goal: u32, config: &PhaseConfig) -> Decimal {
        if months_to_goal == 0 {
            return Decimal::ZERO;
        }
        self.amount_remaining(config) / Decimal::from(months_to_goal)
    }

    /// Months until the fund is complete at `monthly_contribution`.
    ///
    /// None when the fund is already complete or the contribution is not
    /// positive.
    pub fn months_to_completion(
        &self,
        monthly_contribution: Decimal,
        config: &PhaseConfig,
    ) -> Option<Decimal> {
        if monthly_contribution <= Decimal::ZERO || self.is_complete(config) {
            return None;
        }
        self.amount_remaining(config).checked_div(monthly_contribution)
    }
}

/// Phase classification and the savings split that applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseResult {
    pub phase: Phase,
    pub ef_share: Decimal,
    pub invest_share: Decimal,
    pub coverage_months: Decimal,
}

/// A month's savings divided according to the phase split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlan {
    pub phase: Phase,
    pub ef_amount: Decimal,
    pub invest_amount: Decimal,
}
