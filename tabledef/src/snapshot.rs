//! This module contains the snapshots of a database schema.
//!
//! A snapshot captures every resolved table at a given time, together with the version of the
//! snapshot format. Comparing the snapshot of the last deployment with the current one tells
//! which tables and columns changed; see [`SnapshotDiff`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DbConfig;
use crate::schema::{DbTables, TableFingerprint};

mod diff;
mod error;

pub use self::diff::{ColumnChange, SnapshotDiff, TableDiff};
pub use self::error::{SnapshotError, SnapshotResult};

/// Version of the snapshot format produced by this crate.
pub const MIGRATION_VERSION: &str = "2024-03-12";

/// A versioned capture of every table of a database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSnapshot {
    pub schema: DbTables,
    pub version: String,
}

impl DbSnapshot {
    /// Creates the snapshot of a resolved config.
    pub fn current(config: &DbConfig) -> Self {
        Self {
            schema: config.tables.clone(),
            version: MIGRATION_VERSION.to_string(),
        }
    }

    /// Creates a snapshot without tables, e.g. the state before the first deployment.
    pub fn empty() -> Self {
        Self {
            schema: DbTables::new(),
            version: MIGRATION_VERSION.to_string(),
        }
    }

    /// Returns whether the two snapshots share the same format version and can be compared.
    pub fn is_compatible_with(&self, other: &DbSnapshot) -> bool {
        self.version == other.version
    }

    /// Returns the fingerprint of every table.
    pub fn fingerprints(&self) -> impl Iterator<Item = (&str, TableFingerprint)> {
        self.schema
            .iter()
            .map(|(name, table)| (name.as_str(), table.fingerprint()))
    }

    /// Parses a snapshot from JSON.
    pub fn from_json_str(s: &str) -> SnapshotResult<Self> {
        serde_json::from_str(s).map_err(SnapshotError::from)
    }

    /// Serializes the snapshot into pretty printed JSON.
    pub fn to_json_pretty(&self) -> SnapshotResult<String> {
        serde_json::to_string_pretty(self).map_err(SnapshotError::from)
    }

    /// Reads a snapshot from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> SnapshotResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading snapshot");
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json_str(&content)
    }

    /// Writes the snapshot into a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> SnapshotResult<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), tables = self.schema.len(), "saving snapshot");
        std::fs::write(path, self.to_json_pretty()?).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
