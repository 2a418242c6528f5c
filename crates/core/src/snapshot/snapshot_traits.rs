use crate::errors::Result;
use crate::portfolio::Portfolio;

/// Trait for loading and saving the portfolio snapshot.
pub trait SnapshotRepositoryTrait {
    /// Loads the persisted portfolio, or an empty one when nothing was saved yet.
    fn load(&self) -> Result<Portfolio>;

    /// Replaces the persisted portfolio atomically.
    fn save(&self, portfolio: &Portfolio) -> Result<()>;
}
