use serde::{Deserialize, Serialize};

use super::base::{BaseColumn, BaseColumnOpts, impl_base_opts};

/// A JSON column, as authored in a config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonColumnInput {
    #[serde(flatten)]
    pub base: BaseColumnOpts,
    /// Any JSON value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl_base_opts!(JsonColumnInput);

impl JsonColumnInput {
    /// Sets the default value of the column.
    pub fn with_default(mut self, default: impl Into<serde_json::Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub(crate) fn resolve(self, table: &str, name: &str) -> JsonColumn {
        JsonColumn {
            base: self.base.resolve(table, name),
            default: self.default,
        }
    }
}

/// A resolved JSON column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonColumn {
    #[serde(flatten)]
    pub base: BaseColumn,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_resolve_json_default() {
        let column = JsonColumnInput::default()
            .optional()
            .with_default(serde_json::json!({ "theme": "dark" }))
            .resolve("Author", "settings");
        assert!(column.base.optional);
        assert_eq!(column.default, Some(serde_json::json!({ "theme": "dark" })));
    }
}
