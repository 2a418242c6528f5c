//! Portfolio module - holdings, cash and valuation queries.

mod portfolio_model;
mod portfolio_store;

pub use portfolio_model::{
    normalize_ticker, normalize_venue, AssetClass, NewPosition, Portfolio, Position,
};
pub use portfolio_store::PortfolioStore;
pub(crate) use portfolio_store::weight_of;
