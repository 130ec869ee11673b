use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// `CURRENT_TIMESTAMP`, the usual default of date columns.
pub const NOW: SqlExpr = SqlExpr::from_static("CURRENT_TIMESTAMP");
/// SQL `TRUE`.
pub const TRUE: SqlExpr = SqlExpr::from_static("TRUE");
/// SQL `FALSE`.
pub const FALSE: SqlExpr = SqlExpr::from_static("FALSE");

/// A raw SQL expression, used as a column default in place of a literal value.
///
/// It is serialized as `{ "sql": "<expression>" }`, so it can be told apart from literal defaults.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlExpr {
    sql: Cow<'static, str>,
}

impl SqlExpr {
    /// Creates a new SQL expression.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: Cow::Owned(sql.into()),
        }
    }

    /// Creates a SQL expression from a static string.
    pub const fn from_static(sql: &'static str) -> Self {
        Self {
            sql: Cow::Borrowed(sql),
        }
    }

    /// Returns the SQL source of the expression.
    pub fn as_str(&self) -> &str {
        &self.sql
    }
}

impl fmt::Display for SqlExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}
