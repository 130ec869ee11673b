use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::base::{BaseColumn, BaseColumnOpts, impl_base_opts};
use super::check_primary_key;
use crate::schema::{ColumnRef, SchemaResult, SqlExpr};

/// Default value of a number column.
///
/// Literal defaults are kept as [`Decimal`] so that they compare exactly. They are written as
/// decimal strings, e.g. `"9223372036854775807"`, and read from either numbers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberDefault {
    Value(Decimal),
    Sql(SqlExpr),
}

impl From<i32> for NumberDefault {
    fn from(value: i32) -> Self {
        NumberDefault::Value(value.into())
    }
}

impl From<i64> for NumberDefault {
    fn from(value: i64) -> Self {
        NumberDefault::Value(value.into())
    }
}

impl From<Decimal> for NumberDefault {
    fn from(value: Decimal) -> Self {
        NumberDefault::Value(value)
    }
}

impl From<SqlExpr> for NumberDefault {
    fn from(sql: SqlExpr) -> Self {
        NumberDefault::Sql(sql)
    }
}

/// A number column, as authored in a config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberColumnInput {
    #[serde(flatten)]
    pub base: BaseColumnOpts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<NumberDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
}

/// The options of a number column, without the column type.
pub type NumberColumnOpts = NumberColumnInput;

impl_base_opts!(NumberColumnInput);

impl NumberColumnInput {
    /// Makes the column the primary key of its table.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = Some(true);
        self
    }

    /// Sets the default value of the column.
    pub fn with_default(mut self, default: impl Into<NumberDefault>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Makes the column reference `column` of `table`.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ColumnRef::new(table, column));
        self
    }

    pub(crate) fn resolve(self, table: &str, name: &str) -> SchemaResult<NumberColumn> {
        let primary_key = self.primary_key.unwrap_or(false);
        if primary_key {
            check_primary_key(&self.base, self.default.is_some(), table, name)?;
        }

        Ok(NumberColumn {
            base: self.base.resolve(table, name),
            primary_key,
            default: self.default,
            references: self.references,
        })
    }
}

/// A resolved number column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberColumn {
    #[serde(flatten)]
    pub base: BaseColumn,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<NumberDefault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
}
