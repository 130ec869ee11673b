//! This module contains the types describing a database schema: columns, tables, indexes and
//! foreign keys.
//!
//! Every entity comes in two forms:
//!
//! - an *input* form, which is what users author (every option may be omitted);
//! - a *resolved* form, produced by validation, where all the defaults are applied and the
//!   owning table and column names are known.

pub mod column;
mod error;
mod foreign_key;
mod index;
mod maybe_array;
mod sql;
mod table;

pub use rust_decimal::Decimal;

pub use self::column::{
    BaseColumn, BaseColumnOpts, BooleanColumn, BooleanColumnInput, BooleanDefault, ColumnInput,
    ColumnType, DateColumn, DateColumnInput, DateDefault, DateDefaultInput, DbColumn, DbColumns,
    JsonColumn, JsonColumnInput, NumberColumn, NumberColumnInput, NumberColumnOpts, NumberDefault,
    TextColumn, TextColumnInput, TextColumnOpts, TextDefault,
};
pub use self::error::{SchemaError, SchemaResult};
pub use self::foreign_key::{ColumnRef, ForeignKey, ForeignKeyInput, References};
pub use self::index::{Index, IndexInput, Indexes, IndexesInput};
pub use self::maybe_array::MaybeArray;
pub use self::sql::{FALSE, NOW, SqlExpr, TRUE};
#[allow(deprecated)]
pub use self::table::ResolvedCollectionConfig;
pub use self::table::{
    ColumnsConfig, DbTable, DbTables, OutputColumnsConfig, Table, TableConfig, TableFingerprint,
};
pub(crate) use self::table::check_references;

/// Checks that `name` is a valid identifier for a table, column or index.
///
/// Identifiers start with an ASCII letter or `_` and continue with ASCII alphanumerics or `_`.
pub(crate) fn check_identifier(kind: &'static str, name: &str) -> SchemaResult<()> {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_');

    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidName {
            kind,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_accept_identifiers() {
        assert!(check_identifier("table", "Author").is_ok());
        assert!(check_identifier("table", "_private").is_ok());
        assert!(check_identifier("column", "author_id2").is_ok());
    }

    #[test]
    fn test_should_reject_invalid_identifiers() {
        for name in ["", "2fast", "with space", "dash-ed", "quo\"te"] {
            assert_eq!(
                check_identifier("column", name),
                Err(SchemaError::InvalidName {
                    kind: "column",
                    name: name.to_string(),
                })
            );
        }
    }
}
