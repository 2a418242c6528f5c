//! Persisted portfolio snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::portfolio::Portfolio;

/// On-disk form of a [`Portfolio`], stamped with the time it was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub portfolio: Portfolio,
}

impl PortfolioSnapshot {
    pub fn new(portfolio: Portfolio) -> Self {
        Self {
            saved_at: Some(Utc::now()),
            portfolio,
        }
    }
}

impl From<PortfolioSnapshot> for Portfolio {
    fn from(snapshot: PortfolioSnapshot) -> Self {
        snapshot.portfolio
    }
}
