//! This module contains the root of a schema config: the set of tables of a database.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::schema::{DbTable, DbTables, SchemaResult, Table, TableConfig, check_references};

mod error;
mod loader;

pub use self::error::{ConfigError, ConfigResult};

/// A database config, as authored by the user.
///
/// ```toml
/// [tables.Author.columns.id]
/// type = "number"
/// primary_key = true
///
/// [tables.Author.columns.name]
/// type = "text"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfigInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<BTreeMap<String, TableConfig>>,
}

impl DbConfigInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the table `name`; a table with the same name is replaced.
    pub fn table(mut self, name: impl Into<String>, table: TableConfig) -> Self {
        self.tables
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), table);
        self
    }

    /// Adds the table defined by `T`.
    pub fn with_table<T>(self) -> Self
    where
        T: Table,
    {
        self.table(T::table_name(), T::table_config())
    }

    /// Moves the tables of `other` into this config.
    ///
    /// Fails if a table is defined in both configs; in that case `self` is left untouched.
    pub fn merge(&mut self, other: DbConfigInput) -> ConfigResult<()> {
        let Some(other_tables) = other.tables else {
            return Ok(());
        };
        let tables = self.tables.get_or_insert_with(BTreeMap::new);
        if let Some(duplicate) = other_tables.keys().find(|name| tables.contains_key(*name)) {
            return Err(ConfigError::DuplicateTable(duplicate.clone()));
        }

        debug!(tables = other_tables.len(), "merging config tables");
        tables.extend(other_tables);

        Ok(())
    }

    /// Validates the config and resolves every table.
    pub fn resolve(self) -> SchemaResult<DbConfig> {
        let tables = self
            .tables
            .unwrap_or_default()
            .into_iter()
            .map(|(name, table)| {
                let table = table.resolve(&name)?;
                Ok((name, table))
            })
            .collect::<SchemaResult<DbTables>>()?;
        check_references(&tables)?;

        info!(tables = tables.len(), "resolved db config");

        Ok(DbConfig { tables })
    }
}

/// A resolved database config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub tables: DbTables,
}

impl DbConfig {
    /// Returns the table named `name`.
    pub fn table(&self, name: &str) -> Option<&DbTable> {
        self.tables.get(name)
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::schema::{ColumnRef, References, SchemaError, column};

    fn author() -> TableConfig {
        TableConfig::new()
            .column("id", column::number().primary_key())
            .column("name", column::text())
    }

    #[test]
    fn test_should_resolve_empty_config() {
        let config = DbConfigInput::new().resolve().expect("failed to resolve");
        assert!(config.tables.is_empty());
    }

    #[test]
    fn test_should_resolve_config_with_references() {
        let config = DbConfigInput::new()
            .table(
                "Comment",
                TableConfig::new()
                    .column("author_id", column::number())
                    .foreign_key(
                        "author_id",
                        References::deferred(|| ColumnRef::new("Author", "id").into()),
                    ),
            )
            .table("Author", author())
            .resolve()
            .expect("failed to resolve");

        let comment = config.table("Comment").expect("missing table");
        assert_eq!(
            comment.foreign_keys[0].references,
            vec![ColumnRef::new("Author", "id")]
        );
        assert_eq!(
            comment.columns["author_id"].base().collection,
            "Comment".to_string()
        );
    }

    #[test]
    fn test_should_fail_on_unknown_reference() {
        let result = DbConfigInput::new()
            .table(
                "Comment",
                TableConfig::new().column("author_id", column::number().references("Author", "id")),
            )
            .resolve();
        assert!(matches!(
            result,
            Err(SchemaError::UnknownReference { table, .. }) if table == "Comment"
        ));
    }

    #[test]
    fn test_should_merge_configs() {
        let mut config = DbConfigInput::new().table("Author", author());
        config
            .merge(DbConfigInput::new().table("Tag", author()))
            .expect("failed to merge");
        config.merge(DbConfigInput::new()).expect("failed to merge");

        let tables = config.tables.as_ref().expect("no tables");
        assert_eq!(
            tables.keys().cloned().collect::<Vec<_>>(),
            vec!["Author".to_string(), "Tag".to_string()]
        );
    }

    #[test]
    fn test_should_not_merge_duplicated_tables() {
        let mut config = DbConfigInput::new().table("Author", author());
        let result = config.merge(
            DbConfigInput::new()
                .table("Tag", author())
                .table("Author", author()),
        );
        assert!(matches!(result, Err(ConfigError::DuplicateTable(name)) if name == "Author"));
        assert_eq!(config.tables.as_ref().map(BTreeMap::len), Some(1));
    }
}
