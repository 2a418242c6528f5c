//! Snapshot module - JSON persistence of the portfolio with atomic replace.

mod snapshot_model;
mod snapshot_repository;
mod snapshot_traits;

pub use snapshot_model::PortfolioSnapshot;
pub use snapshot_repository::{load_snapshot, save_snapshot, JsonSnapshotRepository};
pub use snapshot_traits::SnapshotRepositoryTrait;

#[cfg(test)]
mod snapshot_repository_tests;
