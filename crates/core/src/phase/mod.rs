//! Emergency-fund phase module - phase classification, savings split and
//! per-phase allocation targets.

mod phase_detector;
mod phase_model;

pub use phase_detector::{
    detect_phase, detect_phase_with_hysteresis, phase_allocation_target, savings_split,
};
pub use phase_model::{EmergencyFundState, Phase, PhaseResult, SavingsPlan};
