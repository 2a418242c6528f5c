//! Rebalancing module - drift evaluation against allocation targets,
//! rebalance trades and concentration policy checks.

mod policy_checks;
mod rebalance_analyzer;
mod rebalance_model;

pub use policy_checks::check_policy_limits;
pub use rebalance_analyzer::{
    analyze, compute_drift, evaluate, rebalance_trades, resolve_threshold,
};
pub use rebalance_model::{
    AllocationTarget, DriftDecision, PolicyCheck, PolicyReport, PolicyRule, PolicyStatus,
    RebalanceAction, RebalanceEntry, RebalanceTrade,
};


#[cfg(test)]
mod policy_checks_tests;
