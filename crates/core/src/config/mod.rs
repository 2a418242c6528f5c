//! Configuration module - tunable constants for every calculator.

mod config_model;

pub use config_model::{
    AnalyticsConfig, PhaseConfig, PolicyLimits, RebalanceConfig, RiskConfig, SavingsSplit,
    SizingConfig,
};

#[cfg(test)]
mod config_model_tests;
