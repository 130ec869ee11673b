use serde::{Deserialize, Serialize};

use super::base::{BaseColumn, BaseColumnOpts, impl_base_opts};
use super::check_primary_key;
use crate::schema::{ColumnRef, SchemaError, SchemaResult, SqlExpr};

/// Default value of a text column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextDefault {
    Value(String),
    Sql(SqlExpr),
}

impl From<&str> for TextDefault {
    fn from(value: &str) -> Self {
        TextDefault::Value(value.to_string())
    }
}

impl From<String> for TextDefault {
    fn from(value: String) -> Self {
        TextDefault::Value(value)
    }
}

impl From<SqlExpr> for TextDefault {
    fn from(sql: SqlExpr) -> Self {
        TextDefault::Sql(sql)
    }
}

/// A text column, as authored in a config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColumnInput {
    #[serde(flatten)]
    pub base: BaseColumnOpts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TextDefault>,
    /// Hint for editors that the text spans several lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,
    /// The only values allowed in the column.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
}

/// The options of a text column, without the column type.
pub type TextColumnOpts = TextColumnInput;

impl_base_opts!(TextColumnInput);

impl TextColumnInput {
    /// Makes the column the primary key of its table.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = Some(true);
        self
    }

    /// Sets the default value of the column.
    pub fn with_default(mut self, default: impl Into<TextDefault>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Marks the text as multiline.
    pub fn multiline(mut self) -> Self {
        self.multiline = Some(true);
        self
    }

    /// Restricts the column to the given values.
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Makes the column reference `column` of `table`.
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ColumnRef::new(table, column));
        self
    }

    pub(crate) fn resolve(self, table: &str, name: &str) -> SchemaResult<TextColumn> {
        let primary_key = self.primary_key.unwrap_or(false);
        if primary_key {
            check_primary_key(&self.base, self.default.is_some(), table, name)?;
        }
        if self.enum_values.as_ref().is_some_and(Vec::is_empty) {
            return Err(SchemaError::EmptyEnum {
                table: table.to_string(),
                column: name.to_string(),
            });
        }

        Ok(TextColumn {
            base: self.base.resolve(table, name),
            primary_key,
            default: self.default,
            multiline: self.multiline.unwrap_or(false),
            enum_values: self.enum_values,
            references: self.references,
        })
    }
}

/// A resolved text column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextColumn {
    #[serde(flatten)]
    pub base: BaseColumn,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TextDefault>,
    #[serde(default)]
    pub multiline: bool,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
}
