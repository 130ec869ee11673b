#![crate_name = "tabledef"]
#![crate_type = "lib"]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # tabledef
//!
//! Typed definitions for database schemas.
//!
//! A schema is authored as a [`DbConfigInput`](crate::config::DbConfigInput), either in code
//! with the column builders and `#[derive(Table)]`, or loaded from a TOML/JSON file.
//! Resolving it validates the shape of every table and produces a
//! [`DbConfig`](crate::config::DbConfig) whose tables carry all their defaults.
//!
//! Resolved tables can be captured in a [`DbSnapshot`](crate::snapshot::DbSnapshot) and two
//! snapshots can be compared with [`SnapshotDiff`](crate::snapshot::SnapshotDiff).
//!
//! ```rust
//! use tabledef::prelude::*;
//!
//! let config = DbConfigInput::new()
//!     .table(
//!         "Author",
//!         TableConfig::new()
//!             .column("id", column::number().primary_key())
//!             .column("name", column::text()),
//!     )
//!     .table(
//!         "Comment",
//!         TableConfig::new()
//!             .column("author_id", column::number().references("Author", "id"))
//!             .column("body", column::text().multiline())
//!             .column("published", column::date().with_default(NOW)),
//!     )
//!     .resolve()
//!     .expect("valid config");
//!
//! let snapshot = DbSnapshot::current(&config);
//! assert_eq!(snapshot.schema.len(), 2);
//! ```

// makes the crate accessible as `tabledef` in macros
extern crate self as tabledef;

use thiserror::Error;

pub mod config;
pub mod integration;
pub mod prelude;
pub mod schema;
pub mod snapshot;

/// Tabledef Error type
#[derive(Debug, Error)]
pub enum TabledefError {
    #[error("Config error: {0}")]
    Config(#[from] self::config::ConfigError),
    #[error("Integration error: {0}")]
    Integration(#[from] self::integration::IntegrationError),
    #[error("Schema error: {0}")]
    Schema(#[from] self::schema::SchemaError),
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] self::snapshot::SnapshotError),
}

/// Tabledef Result type
pub type TabledefResult<T> = Result<T, TabledefError>;
