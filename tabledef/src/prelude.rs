//! Re-exports all the most commonly used items from this crate.

pub use tabledef_macros::Table;

pub use crate::config::{ConfigError, ConfigResult, DbConfig, DbConfigInput};
pub use crate::integration::{
    DbIntegration, DbSetupContext, Entrypoint, ExtendDbOptions, IntegrationError,
    IntegrationExtension, IntegrationResult,
};
pub use crate::schema::column;
pub use crate::schema::{
    ColumnInput, ColumnRef, ColumnType, DbColumn, DbTable, DbTables, FALSE, ForeignKeyInput,
    IndexInput, MaybeArray, NOW, References, SchemaError, SchemaResult, SqlExpr, TRUE, Table,
    TableConfig,
};
pub use crate::snapshot::{DbSnapshot, SnapshotDiff, SnapshotError, SnapshotResult};
pub use crate::{TabledefError, TabledefResult};
