//! This module exposes the column types supported by a table schema.
//!
//! Columns are built with the constructors of this module, e.g.
//!
//! ```rust
//! use tabledef::prelude::*;
//!
//! let id = column::number().primary_key();
//! let title = column::text().unique().label("Post title");
//! let published = column::date().with_default(NOW);
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{ColumnRef, SchemaError, SchemaResult};

mod base;
mod boolean;
mod date;
mod json;
mod number;
mod text;

pub use self::base::{BaseColumn, BaseColumnOpts};
pub use self::boolean::{BooleanColumn, BooleanColumnInput, BooleanDefault};
pub use self::date::{DateColumn, DateColumnInput, DateDefault, DateDefaultInput};
pub use self::json::{JsonColumn, JsonColumnInput};
pub use self::number::{NumberColumn, NumberColumnInput, NumberColumnOpts, NumberDefault};
pub use self::text::{TextColumn, TextColumnInput, TextColumnOpts, TextDefault};

/// Creates a boolean column.
pub fn boolean() -> BooleanColumnInput {
    Default::default()
}

/// Creates a number column.
pub fn number() -> NumberColumnInput {
    Default::default()
}

/// Creates a text column.
pub fn text() -> TextColumnInput {
    Default::default()
}

/// Creates a date column.
pub fn date() -> DateColumnInput {
    Default::default()
}

/// Creates a JSON column.
pub fn json() -> JsonColumnInput {
    Default::default()
}

/// An enumeration of all supported column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Boolean,
    Number,
    Text,
    Date,
    Json,
}

impl ColumnType {
    /// Returns whether a foreign key may point to a column of this type.
    pub fn is_referenceable(self) -> bool {
        matches!(self, ColumnType::Number | ColumnType::Text)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Number => "number",
            ColumnType::Text => "text",
            ColumnType::Date => "date",
            ColumnType::Json => "json",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A column as authored in a config.
///
/// The column type is carried by the `type` key, next to the column options:
///
/// ```toml
/// [tables.Author.columns.name]
/// type = "text"
/// unique = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnInput {
    Boolean(BooleanColumnInput),
    Number(NumberColumnInput),
    Text(TextColumnInput),
    Date(DateColumnInput),
    Json(JsonColumnInput),
}

/// A column with all of its options resolved.
///
/// It is serialized as `{ "type": "<column type>", "schema": { <options> } }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "schema", rename_all = "lowercase")]
pub enum DbColumn {
    Boolean(BooleanColumn),
    Number(NumberColumn),
    Text(TextColumn),
    Date(DateColumn),
    Json(JsonColumn),
}

/// Resolved columns of a table, by column name, in declaration order.
pub type DbColumns = IndexMap<String, DbColumn>;

// macro rules for implementing conversions between column variants and the column enums
macro_rules! impl_conv_for_column {
    ($variant:ident, $input:ty, $resolved:ty, $name:ident) => {
        impl From<$input> for ColumnInput {
            fn from(column: $input) -> Self {
                ColumnInput::$variant(column)
            }
        }

        impl From<$resolved> for DbColumn {
            fn from(column: $resolved) -> Self {
                DbColumn::$variant(column)
            }
        }

        impl DbColumn {
            /// Attempts to extract a reference to the inner column if it matches the variant.
            pub fn $name(&self) -> Option<&$resolved> {
                if let DbColumn::$variant(column) = self {
                    Some(column)
                } else {
                    None
                }
            }
        }
    };
}

impl_conv_for_column!(Boolean, BooleanColumnInput, BooleanColumn, as_boolean);
impl_conv_for_column!(Number, NumberColumnInput, NumberColumn, as_number);
impl_conv_for_column!(Text, TextColumnInput, TextColumn, as_text);
impl_conv_for_column!(Date, DateColumnInput, DateColumn, as_date);
impl_conv_for_column!(Json, JsonColumnInput, JsonColumn, as_json);

impl ColumnInput {
    /// Returns the type of the column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnInput::Boolean(_) => ColumnType::Boolean,
            ColumnInput::Number(_) => ColumnType::Number,
            ColumnInput::Text(_) => ColumnType::Text,
            ColumnInput::Date(_) => ColumnType::Date,
            ColumnInput::Json(_) => ColumnType::Json,
        }
    }

    /// Returns the options shared by every column type.
    pub fn base(&self) -> &BaseColumnOpts {
        match self {
            ColumnInput::Boolean(column) => &column.base,
            ColumnInput::Number(column) => &column.base,
            ColumnInput::Text(column) => &column.base,
            ColumnInput::Date(column) => &column.base,
            ColumnInput::Json(column) => &column.base,
        }
    }

    /// Resolves the column `name` of `table`, applying the defaults of every option.
    pub fn resolve(self, table: &str, name: &str) -> SchemaResult<DbColumn> {
        if let Some(option) = self.base().unknown.keys().next() {
            return Err(SchemaError::UnknownColumnOption {
                table: table.to_string(),
                column: name.to_string(),
                option: option.clone(),
            });
        }

        match self {
            ColumnInput::Boolean(column) => Ok(column.resolve(table, name).into()),
            ColumnInput::Number(column) => column.resolve(table, name).map(Into::into),
            ColumnInput::Text(column) => column.resolve(table, name).map(Into::into),
            ColumnInput::Date(column) => Ok(column.resolve(table, name).into()),
            ColumnInput::Json(column) => Ok(column.resolve(table, name).into()),
        }
    }
}

impl DbColumn {
    /// Returns the type of the column.
    pub fn column_type(&self) -> ColumnType {
        match self {
            DbColumn::Boolean(_) => ColumnType::Boolean,
            DbColumn::Number(_) => ColumnType::Number,
            DbColumn::Text(_) => ColumnType::Text,
            DbColumn::Date(_) => ColumnType::Date,
            DbColumn::Json(_) => ColumnType::Json,
        }
    }

    /// Returns the options shared by every column type.
    pub fn base(&self) -> &BaseColumn {
        match self {
            DbColumn::Boolean(column) => &column.base,
            DbColumn::Number(column) => &column.base,
            DbColumn::Text(column) => &column.base,
            DbColumn::Date(column) => &column.base,
            DbColumn::Json(column) => &column.base,
        }
    }

    /// Returns the name of the column.
    pub fn name(&self) -> &str {
        &self.base().name
    }

    /// Returns whether the column is the primary key of its table.
    pub fn is_primary_key(&self) -> bool {
        match self {
            DbColumn::Number(column) => column.primary_key,
            DbColumn::Text(column) => column.primary_key,
            _ => false,
        }
    }

    /// Returns the column referenced by this column, if any.
    pub fn references(&self) -> Option<&ColumnRef> {
        match self {
            DbColumn::Number(column) => column.references.as_ref(),
            DbColumn::Text(column) => column.references.as_ref(),
            _ => None,
        }
    }

    /// Returns whether the column declares a default value.
    pub fn has_default(&self) -> bool {
        match self {
            DbColumn::Boolean(column) => column.default.is_some(),
            DbColumn::Number(column) => column.default.is_some(),
            DbColumn::Text(column) => column.default.is_some(),
            DbColumn::Date(column) => column.default.is_some(),
            DbColumn::Json(column) => column.default.is_some(),
        }
    }
}

/// Checks the constraints of a primary key column: it can be neither optional nor defaulted.
fn check_primary_key(
    base: &BaseColumnOpts,
    has_default: bool,
    table: &str,
    column: &str,
) -> SchemaResult<()> {
    if base.optional.unwrap_or(false) {
        return Err(SchemaError::PrimaryKeyOptional {
            table: table.to_string(),
            column: column.to_string(),
        });
    }
    if has_default {
        return Err(SchemaError::PrimaryKeyDefault {
            table: table.to_string(),
            column: column.to_string(),
        });
    }

    Ok(())
}
