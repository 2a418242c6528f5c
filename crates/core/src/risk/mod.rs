//! Risk metrics module - CAGR, volatility, Sharpe, Sortino and drawdown over
//! daily return series.

mod risk_metrics;
mod risk_model;

pub use risk_metrics::{
    annualized_volatility, cagr, downside_deviation, drawdown_details, max_drawdown,
    mean_annual_return, sharpe_ratio, sortino_ratio,
};
pub use risk_model::{DrawdownInfo, ReturnSeries, RiskMetrics};
