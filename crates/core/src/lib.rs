//! Nestegg Core - portfolio analytics for a personal investment tracker.
//!
//! Holds the in-memory portfolio and the calculators that read from it:
//! risk metrics over return series, Kelly position sizing, emergency-fund
//! phase detection and allocation drift analysis. Everything here is
//! synchronous and free of I/O apart from the JSON snapshot helpers.

pub mod config;
pub mod constants;
pub mod errors;
pub mod phase;
pub mod portfolio;
pub mod rebalance;
pub mod risk;
pub mod sizing;
pub mod snapshot;

pub use config::AnalyticsConfig;
pub use portfolio::{AssetClass, Portfolio, PortfolioStore, Position};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
