use std::collections::BTreeMap;

use tracing::debug;

use super::{DbSnapshot, SnapshotError, SnapshotResult};
use crate::schema::{ColumnType, DbColumn, DbColumns, DbTable, Indexes};

/// Differences between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Tables only found in the new snapshot.
    pub added_tables: BTreeMap<String, DbTable>,
    /// Tables only found in the old snapshot.
    pub dropped_tables: BTreeMap<String, DbTable>,
    /// Tables found in both snapshots, with a different definition.
    pub changed_tables: BTreeMap<String, TableDiff>,
}

/// Differences between two definitions of the same table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableDiff {
    pub added_columns: DbColumns,
    pub dropped_columns: DbColumns,
    pub updated_columns: BTreeMap<String, ColumnChange>,
    /// Indexes only found in the new table. An index whose definition changed is reported
    /// both as dropped and added.
    pub added_indexes: Indexes,
    pub dropped_indexes: Indexes,
    pub foreign_keys_changed: bool,
    pub deprecated_changed: bool,
}

/// Old and new definition of a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnChange {
    pub old: DbColumn,
    pub new: DbColumn,
}

impl ColumnChange {
    /// Returns whether the column changed type.
    pub fn type_changed(&self) -> bool {
        self.old.column_type() != self.new.column_type()
    }

    /// Returns the old and new type of the column.
    pub fn types(&self) -> (ColumnType, ColumnType) {
        (self.old.column_type(), self.new.column_type())
    }
}

impl SnapshotDiff {
    /// Computes the differences going from `old` to `new`.
    ///
    /// Fails if the snapshots were written with different format versions.
    pub fn between(old: &DbSnapshot, new: &DbSnapshot) -> SnapshotResult<Self> {
        if !old.is_compatible_with(new) {
            return Err(SnapshotError::IncompatibleVersion {
                old: old.version.clone(),
                new: new.version.clone(),
            });
        }

        let mut diff = SnapshotDiff::default();
        for (name, old_table) in &old.schema {
            match new.schema.get(name) {
                None => {
                    diff.dropped_tables.insert(name.clone(), old_table.clone());
                }
                Some(new_table) if old_table.fingerprint() != new_table.fingerprint() => {
                    let table_diff = TableDiff::between(old_table, new_table);
                    if !table_diff.is_empty() {
                        diff.changed_tables.insert(name.clone(), table_diff);
                    }
                }
                Some(_) => {}
            }
        }
        diff.added_tables = new
            .schema
            .iter()
            .filter(|(name, _)| !old.schema.contains_key(*name))
            .map(|(name, table)| (name.clone(), table.clone()))
            .collect();

        debug!(
            added = diff.added_tables.len(),
            dropped = diff.dropped_tables.len(),
            changed = diff.changed_tables.len(),
            "computed snapshot diff"
        );

        Ok(diff)
    }

    /// Returns whether the snapshots have the same tables.
    pub fn is_empty(&self) -> bool {
        self.added_tables.is_empty()
            && self.dropped_tables.is_empty()
            && self.changed_tables.is_empty()
    }
}

impl TableDiff {
    /// Computes the differences going from `old` to `new`.
    pub fn between(old: &DbTable, new: &DbTable) -> Self {
        let updated_columns = old
            .columns
            .iter()
            .filter_map(|(name, old_column)| {
                new.columns
                    .get(name)
                    .filter(|new_column| *new_column != old_column)
                    .map(|new_column| {
                        let change = ColumnChange {
                            old: old_column.clone(),
                            new: new_column.clone(),
                        };
                        (name.clone(), change)
                    })
            })
            .collect();

        let mut diff = TableDiff {
            added_columns: added(&old.columns, &new.columns),
            dropped_columns: added(&new.columns, &old.columns),
            updated_columns,
            added_indexes: Indexes::new(),
            dropped_indexes: Indexes::new(),
            foreign_keys_changed: old.foreign_keys != new.foreign_keys,
            deprecated_changed: old.deprecated != new.deprecated,
        };

        for (name, new_index) in &new.indexes {
            match old.indexes.get(name) {
                Some(old_index) if old_index == new_index => {}
                Some(old_index) => {
                    diff.dropped_indexes.insert(name.clone(), old_index.clone());
                    diff.added_indexes.insert(name.clone(), new_index.clone());
                }
                None => {
                    diff.added_indexes.insert(name.clone(), new_index.clone());
                }
            }
        }
        diff.dropped_indexes.extend(
            old.indexes
                .iter()
                .filter(|(name, _)| !new.indexes.contains_key(*name))
                .map(|(name, index)| (name.clone(), index.clone())),
        );

        diff
    }

    /// Returns whether the tables have the same definition.
    pub fn is_empty(&self) -> bool {
        self.added_columns.is_empty()
            && self.dropped_columns.is_empty()
            && self.updated_columns.is_empty()
            && self.added_indexes.is_empty()
            && self.dropped_indexes.is_empty()
            && !self.foreign_keys_changed
            && !self.deprecated_changed
    }
}

/// Returns the columns of `new` missing from `old`.
fn added(old: &DbColumns, new: &DbColumns) -> DbColumns {
    new.iter()
        .filter(|(name, _)| !old.contains_key(*name))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
