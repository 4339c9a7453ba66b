use crate::common::{DomainError, DomainResult};
use crate::domains::location::LocationTable;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCATIONS_FILE_ENV: &str = "CAMPUS_LOCATIONS_FILE";

/// Loads the campus location table from a `.toml` or `.json` file mapping each
/// name to `{ x, y }`.
pub struct FilesystemLocationSource {
    path: PathBuf,
}

impl FilesystemLocationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Explicit path first, then `CAMPUS_LOCATIONS_FILE`; `None` when neither is set.
    pub fn discover(explicit: Option<&str>) -> Option<Self> {
        explicit
            .map(PathBuf::from)
            .or_else(|| env::var(LOCATIONS_FILE_ENV).ok().map(PathBuf::from))
            .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> DomainResult<LocationTable> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            DomainError::InfrastructureError(format!("{}: {}", self.path.display(), e))
        })?;

        let table: LocationTable = match self.path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&raw)
                .map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?,
            _ => toml::from_str(&raw).map_err(|e| DomainError::InfrastructureError(format!("{}", e)))?,
        };

        if table.is_empty() {
            return Err(DomainError::InfrastructureError(format!(
                "{} defines no locations",
                self.path.display()
            )));
        }
        Ok(table)
    }
}

/// The configured file when there is one, otherwise the built-in campus table.
pub fn load_location_table(explicit: Option<&str>) -> DomainResult<LocationTable> {
    match FilesystemLocationSource::discover(explicit) {
        Some(source) => source.load(),
        None => Ok(LocationTable::campus_default()),
    }
}
