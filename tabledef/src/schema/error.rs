use thiserror::Error;

use crate::schema::{ColumnRef, ColumnType};

/// An enum representing the reasons a schema config can be rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A column reference string is not in the `table.column` form.
    #[error("Invalid column reference `{0}`; expected `table.column`")]
    InvalidColumnRef(String),
    /// A table, column or index name is not a valid identifier.
    #[error("Invalid {kind} name `{name}`")]
    InvalidName { kind: &'static str, name: String },
    /// A table declares no columns.
    #[error("Table `{table}` has no columns")]
    EmptyTable { table: String },
    /// A primary key column is marked as optional.
    #[error("Primary key column `{table}.{column}` cannot be optional")]
    PrimaryKeyOptional { table: String, column: String },
    /// A primary key column declares a default value.
    #[error("Primary key column `{table}.{column}` cannot have a default value")]
    PrimaryKeyDefault { table: String, column: String },
    /// More than one column of the same table is a primary key.
    #[error("Table `{table}` has more than one primary key: {}", columns.join(", "))]
    MultiplePrimaryKeys { table: String, columns: Vec<String> },
    /// A column declares an option its type doesn't have, e.g. a misspelled one.
    #[error("Unknown option `{option}` in column `{table}.{column}`")]
    UnknownColumnOption {
        table: String,
        column: String,
        option: String,
    },
    /// A text column declares an empty enum.
    #[error("Enum of column `{table}.{column}` must contain at least one value")]
    EmptyEnum { table: String, column: String },
    /// An index or foreign key names a column the table doesn't have.
    #[error("Unknown column `{column}` in {context} of table `{table}`")]
    UnknownColumn {
        table: String,
        column: String,
        context: &'static str,
    },
    /// An index covers no columns.
    #[error("Index `{index}` of table `{table}` has no columns")]
    EmptyIndex { table: String, index: String },
    /// Two indexes of the same table resolve to the same name.
    #[error("Index `{index}` is declared more than once in table `{table}`")]
    DuplicateIndex { table: String, index: String },
    /// A foreign key has no local columns or no references.
    #[error("Foreign key of table `{table}` must have at least one column and one reference")]
    EmptyForeignKey { table: String },
    /// A foreign key has a different number of local columns and references.
    #[error(
        "Foreign key of table `{table}` has {columns} local column(s) but {references} reference(s)"
    )]
    ForeignKeyArity {
        table: String,
        columns: usize,
        references: usize,
    },
    /// A reference points to a table or column that doesn't exist.
    #[error("Table `{table}` references unknown column `{reference}`")]
    UnknownReference { table: String, reference: ColumnRef },
    /// A column references a column of a different type.
    #[error(
        "Column `{table}.{column}` of type {expected} cannot reference `{reference}` of type {found}"
    )]
    ReferenceTypeMismatch {
        table: String,
        column: String,
        reference: ColumnRef,
        expected: ColumnType,
        found: ColumnType,
    },
    /// A foreign key references a column which is neither text nor number.
    #[error("Table `{table}` references `{reference}` of type {found}, which is not referenceable")]
    NotReferenceable {
        table: String,
        reference: ColumnRef,
        found: ColumnType,
    },
}

/// Schema Result type
pub type SchemaResult<T> = Result<T, SchemaError>;
