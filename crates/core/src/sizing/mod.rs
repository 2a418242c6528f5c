//! Position sizing module - Kelly fraction with discounting and a hard cap.

mod position_sizer;
mod sizing_model;

pub use position_sizer::{kelly_fraction, recommended_fraction, recommended_size};
pub use sizing_model::SizingRecommendation;
