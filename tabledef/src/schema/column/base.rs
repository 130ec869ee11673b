use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Options shared by every column type, as authored in a config.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseColumnOpts {
    /// Human readable label of the column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Whether the column may contain NULL values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Whether the column values must be unique across the table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    /// Whether the column is deprecated and about to be removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
    /// Keys not known to the column type; a column with any is rejected when resolved.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, serde_json::Value>,
}

/// Options shared by every column type, resolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub deprecated: bool,
    /// Name of the column.
    pub name: String,
    /// Name of the table owning the column.
    pub collection: String,
}

impl BaseColumnOpts {
    pub(crate) fn resolve(self, table: &str, name: &str) -> BaseColumn {
        BaseColumn {
            label: self.label,
            optional: self.optional.unwrap_or(false),
            unique: self.unique.unwrap_or(false),
            deprecated: self.deprecated.unwrap_or(false),
            name: name.to_string(),
            collection: table.to_string(),
        }
    }
}

// macro rules implementing the builder methods of the base options on a column input
macro_rules! impl_base_opts {
    ($ty:ty) => {
        impl $ty {
            /// Allows NULL values in the column.
            pub fn optional(mut self) -> Self {
                self.base.optional = Some(true);
                self
            }

            /// Requires the column values to be unique.
            pub fn unique(mut self) -> Self {
                self.base.unique = Some(true);
                self
            }

            /// Sets a human readable label for the column.
            pub fn label(mut self, label: impl Into<String>) -> Self {
                self.base.label = Some(label.into());
                self
            }

            /// Marks the column as deprecated.
            pub fn deprecated(mut self) -> Self {
                self.base.deprecated = Some(true);
                self
            }
        }
    };
}

pub(crate) use impl_base_opts;

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn test_should_resolve_defaults() {
        let base = BaseColumnOpts::default().resolve("Author", "name");
        assert_eq!(
            base,
            BaseColumn {
                label: None,
                optional: false,
                unique: false,
                deprecated: false,
                name: "name".to_string(),
                collection: "Author".to_string(),
            }
        );
    }

    #[test]
    fn test_should_keep_authored_options() {
        let base = BaseColumnOpts {
            label: Some("Name".to_string()),
            optional: Some(true),
            unique: Some(true),
            deprecated: Some(true),
            unknown: BTreeMap::new(),
        }
        .resolve("Author", "name");

        assert_eq!(base.label.as_deref(), Some("Name"));
        assert!(base.optional);
        assert!(base.unique);
        assert!(base.deprecated);
    }
}
