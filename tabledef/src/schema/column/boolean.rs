use serde::{Deserialize, Serialize};

use super::base::{BaseColumn, BaseColumnOpts, impl_base_opts};
use crate::schema::SqlExpr;

/// Default value of a boolean column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BooleanDefault {
    Value(bool),
    Sql(SqlExpr),
}

impl From<bool> for BooleanDefault {
    fn from(value: bool) -> Self {
        BooleanDefault::Value(value)
    }
}

impl From<SqlExpr> for BooleanDefault {
    fn from(sql: SqlExpr) -> Self {
        BooleanDefault::Sql(sql)
    }
}

/// A boolean column, as authored in a config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanColumnInput {
    #[serde(flatten)]
    pub base: BaseColumnOpts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<BooleanDefault>,
}

impl_base_opts!(BooleanColumnInput);

impl BooleanColumnInput {
    /// Sets the default value of the column.
    pub fn with_default(mut self, default: impl Into<BooleanDefault>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub(crate) fn resolve(self, table: &str, name: &str) -> BooleanColumn {
        BooleanColumn {
            base: self.base.resolve(table, name),
            default: self.default,
        }
    }
}

/// A resolved boolean column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanColumn {
    #[serde(flatten)]
    pub base: BaseColumn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<BooleanDefault>,
}
