use std::collections::BTreeMap;
use std::hash::{Hash as _, Hasher as _};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::schema::{
    ColumnInput, ColumnRef, DbColumn, DbColumns, ForeignKey, ForeignKeyInput, IndexInput, Indexes,
    IndexesInput, MaybeArray, References, SchemaError, SchemaResult, check_identifier,
};

/// A type representing a fingerprint of a resolved table.
pub type TableFingerprint = u64;

/// Columns of a table as authored in a config, by column name, in declaration order.
pub type ColumnsConfig = IndexMap<String, ColumnInput>;
/// Resolved columns of a table, by column name.
pub type OutputColumnsConfig = DbColumns;

/// Resolved tables, by table name.
pub type DbTables = BTreeMap<String, DbTable>;

/// A table, as authored in a config.
///
/// ```rust
/// use tabledef::prelude::*;
///
/// let comment = TableConfig::new()
///     .column("id", column::number().primary_key())
///     .column("author_id", column::number())
///     .column("body", column::text())
///     .index(IndexInput::on("author_id"))
///     .foreign_key("author_id", ColumnRef::new("Author", "id"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    pub columns: ColumnsConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexes: Option<IndexesInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_keys: Option<Vec<ForeignKeyInput>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

/// A table, as authored in a config.
#[deprecated(note = "Use `TableConfig` instead")]
pub type ResolvedCollectionConfig = TableConfig;

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column named `name`; a column with the same name is replaced in place.
    pub fn column(mut self, name: impl Into<String>, column: impl Into<ColumnInput>) -> Self {
        self.columns.insert(name.into(), column.into());
        self
    }

    /// Adds an index.
    pub fn index(mut self, index: IndexInput) -> Self {
        self.indexes.get_or_insert_with(Default::default).push(index);
        self
    }

    /// Adds a foreign key from the local `columns` to the `references` columns.
    pub fn foreign_key(
        mut self,
        columns: impl Into<MaybeArray<String>>,
        references: impl Into<References>,
    ) -> Self {
        self.foreign_keys
            .get_or_insert_with(Vec::new)
            .push(ForeignKeyInput::new(columns, references));
        self
    }

    /// Marks the table as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = Some(true);
        self
    }

    /// Resolves the table named `name`.
    ///
    /// References to other tables are not checked here, since they require every table of the
    /// config; see [`DbConfigInput::resolve`](crate::config::DbConfigInput::resolve).
    pub fn resolve(self, name: &str) -> SchemaResult<DbTable> {
        check_identifier("table", name)?;
        if self.columns.is_empty() {
            return Err(SchemaError::EmptyTable {
                table: name.to_string(),
            });
        }

        let mut columns = DbColumns::new();
        for (column_name, column) in self.columns {
            check_identifier("column", &column_name)?;
            let column = column.resolve(name, &column_name)?;
            columns.insert(column_name, column);
        }

        let primary_keys = columns
            .iter()
            .filter(|(_, column)| column.is_primary_key())
            .map(|(column_name, _)| column_name.clone())
            .collect::<Vec<_>>();
        if primary_keys.len() > 1 {
            return Err(SchemaError::MultiplePrimaryKeys {
                table: name.to_string(),
                columns: primary_keys,
            });
        }

        let indexes = match self.indexes {
            Some(indexes) => indexes.resolve(name, &columns)?,
            None => Indexes::new(),
        };
        let foreign_keys = self
            .foreign_keys
            .unwrap_or_default()
            .into_iter()
            .map(|foreign_key| foreign_key.resolve(name, &columns))
            .collect::<SchemaResult<Vec<_>>>()?;

        trace!(
            table = name,
            columns = columns.len(),
            indexes = indexes.len(),
            foreign_keys = foreign_keys.len(),
            "resolved table"
        );

        Ok(DbTable {
            columns,
            indexes,
            foreign_keys,
            deprecated: self.deprecated.unwrap_or(false),
        })
    }
}

/// A resolved table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbTable {
    pub columns: DbColumns,
    #[serde(default)]
    pub indexes: Indexes,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(default)]
    pub deprecated: bool,
}

impl DbTable {
    /// Returns the column named `name`.
    pub fn column(&self, name: &str) -> Option<&DbColumn> {
        self.columns.get(name)
    }

    /// Returns the primary key column, if the table has one.
    pub fn primary_key(&self) -> Option<&DbColumn> {
        self.columns.values().find(|column| column.is_primary_key())
    }

    /// Returns a fingerprint of the table definition.
    ///
    /// Two tables with the same definition have the same fingerprint. The value is computed with
    /// the standard hasher, so it must not be persisted across builds.
    pub fn fingerprint(&self) -> TableFingerprint {
        let mut hasher = std::hash::DefaultHasher::new();
        // resolved tables only hold string keyed maps, so serialization cannot fail
        serde_json::to_string(self)
            .unwrap_or_default()
            .hash(&mut hasher);
        hasher.finish()
    }
}

/// A table defined by a Rust type.
///
/// This trait is usually implemented with `#[derive(Table)]`.
pub trait Table {
    /// Returns the name of the table.
    fn table_name() -> &'static str;

    /// Returns the names of the columns, in declaration order.
    fn column_names() -> &'static [&'static str];

    /// Returns the table configuration.
    fn table_config() -> TableConfig;
}

/// Checks every reference between `tables`.
///
/// - column references must target an existing column of the same type;
/// - foreign keys must target existing text or number columns.
pub(crate) fn check_references(tables: &DbTables) -> SchemaResult<()> {
    let lookup = |table: &str, reference: &ColumnRef| {
        tables
            .get(&reference.table)
            .and_then(|target| target.column(&reference.column))
            .ok_or_else(|| SchemaError::UnknownReference {
                table: table.to_string(),
                reference: reference.clone(),
            })
    };

    for (table_name, table) in tables {
        for (column_name, column) in &table.columns {
            let Some(reference) = column.references() else {
                continue;
            };
            let target = lookup(table_name, reference)?;
            if target.column_type() != column.column_type() {
                return Err(SchemaError::ReferenceTypeMismatch {
                    table: table_name.clone(),
                    column: column_name.clone(),
                    reference: reference.clone(),
                    expected: column.column_type(),
                    found: target.column_type(),
                });
            }
        }

        for reference in table
            .foreign_keys
            .iter()
            .flat_map(|foreign_key| foreign_key.references.iter())
        {
            let target = lookup(table_name, reference)?;
            if !target.column_type().is_referenceable() {
                return Err(SchemaError::NotReferenceable {
                    table: table_name.clone(),
                    reference: reference.clone(),
                    found: target.column_type(),
                });
            }
        }
    }

    Ok(())
}
