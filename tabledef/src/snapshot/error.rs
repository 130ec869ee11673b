use thiserror::Error;

/// An enum representing the errors raised while handling snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Error when comparing snapshots written in different format versions.
    #[error("Cannot compare snapshots of version `{old}` and `{new}`")]
    IncompatibleVersion { old: String, new: String },
    /// Error when the snapshot file cannot be read or written.
    #[error("Failed to access snapshot file `{path}`: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    /// Error when the snapshot is not valid JSON or doesn't match the snapshot shape.
    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Snapshot Result type
pub type SnapshotResult<T> = Result<T, SnapshotError>;
