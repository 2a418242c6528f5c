use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::info;

use crate::errors::Result;
use crate::portfolio::Portfolio;

use super::snapshot_model::PortfolioSnapshot;
use super::snapshot_traits::SnapshotRepositoryTrait;

/// Reads a JSON portfolio snapshot. A missing file yields an empty portfolio
/// in the default base currency.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Portfolio> {
    let path = path.as_ref();
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "No portfolio snapshot at {}, starting empty",
                path.display()
            );
            return Ok(Portfolio::default());
        }
        Err(e) => return Err(e.into()),
    };

    let snapshot: PortfolioSnapshot = serde_json::from_str(&json)?;
    info!(
        "Loaded portfolio snapshot from {} ({} positions)",
        path.display(),
        snapshot.portfolio.positions.len()
    );
    Ok(snapshot.into())
}

/// Writes a JSON portfolio snapshot: the full document goes to a sibling
/// `.tmp` file which is then renamed over `path`.
pub fn save_snapshot(path: impl AsRef<Path>, portfolio: &Portfolio) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let snapshot = PortfolioSnapshot::new(portfolio.clone());
    let json = serde_json::to_string_pretty(&snapshot)?;

    let tmp_path = temp_path(path);
    fs::write(&tmp_path, json)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    info!(
        "Saved portfolio snapshot to {} ({} positions)",
        path.display(),
        portfolio.positions.len()
    );
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("portfolio"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// File-backed snapshot repository.
#[derive(Debug, Clone)]
pub struct JsonSnapshotRepository {
    path: PathBuf,
}

impl JsonSnapshotRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotRepositoryTrait for JsonSnapshotRepository {
    fn load(&self) -> Result<Portfolio> {
        load_snapshot(&self.path)
    }

    fn save(&self, portfolio: &Portfolio) -> Result<()> {
        save_snapshot(&self.path, portfolio)
    }
}
