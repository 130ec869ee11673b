use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::schema::{DbColumns, MaybeArray, SchemaError, SchemaResult};

/// A reference to a column of a table.
///
/// It is written as `"table.column"` in configs; a `{ table, column }` map is accepted as well.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColumnRef {
    /// Name of the referenced table (e.g., "Author")
    pub table: String,
    /// Name of the referenced column (e.g., "id")
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

impl FromStr for ColumnRef {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((table, column))
                if !table.is_empty() && !column.is_empty() && !column.contains('.') =>
            {
                Ok(ColumnRef::new(table, column))
            }
            _ => Err(SchemaError::InvalidColumnRef(s.to_string())),
        }
    }
}

impl Serialize for ColumnRef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ColumnRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ColumnRefVisitor;

        impl<'de> Visitor<'de> for ColumnRefVisitor {
            type Value = ColumnRef;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a `table.column` string or a map with `table` and `column`")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse().map_err(E::custom)
            }

            // no `visit_seq`: `["a.b", "c.d"]` must never parse as a single reference
            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = None;
                let mut column = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "table" => table = Some(map.next_value()?),
                        "column" => column = Some(map.next_value()?),
                        other => return Err(de::Error::unknown_field(other, &["table", "column"])),
                    }
                }

                Ok(ColumnRef {
                    table: table.ok_or_else(|| de::Error::missing_field("table"))?,
                    column: column.ok_or_else(|| de::Error::missing_field("column"))?,
                })
            }
        }

        deserializer.deserialize_any(ColumnRefVisitor)
    }
}

/// Function producing the columns referenced by a foreign key.
pub type ReferencesFn = dyn Fn() -> MaybeArray<ColumnRef> + Send + Sync;

/// The columns referenced by a foreign key.
///
/// References may be listed up front, which is what configs loaded from files do, or produced
/// by a function evaluated when the config is resolved. The latter allows tables to be defined
/// in any order in code.
#[derive(Clone)]
pub enum References {
    Columns(MaybeArray<ColumnRef>),
    Deferred(Arc<ReferencesFn>),
}

impl References {
    /// Creates references produced by `f` when the config is resolved.
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> MaybeArray<ColumnRef> + Send + Sync + 'static,
    {
        References::Deferred(Arc::new(f))
    }

    /// Returns the referenced columns, calling the reference function if needed.
    pub fn evaluate(&self) -> Vec<ColumnRef> {
        match self {
            References::Columns(columns) => columns.as_slice().to_vec(),
            References::Deferred(f) => f().into_vec(),
        }
    }
}

impl fmt::Debug for References {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            References::Columns(columns) => f.debug_tuple("Columns").field(columns).finish(),
            References::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

/// Deferred references are equal only to clones of themselves; they are never evaluated.
impl PartialEq for References {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (References::Columns(a), References::Columns(b)) => a == b,
            (References::Deferred(a), References::Deferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for References {}

impl Serialize for References {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            References::Columns(columns) => columns.serialize(serializer),
            References::Deferred(f) => f().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for References {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        MaybeArray::deserialize(deserializer).map(References::Columns)
    }
}

impl From<ColumnRef> for References {
    fn from(column: ColumnRef) -> Self {
        References::Columns(MaybeArray::One(column))
    }
}

impl From<Vec<ColumnRef>> for References {
    fn from(columns: Vec<ColumnRef>) -> Self {
        References::Columns(MaybeArray::Many(columns))
    }
}

/// A foreign key, as authored in a config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyInput {
    /// Local columns holding the key.
    pub columns: MaybeArray<String>,
    /// Columns of the foreign table, paired by position with `columns`.
    pub references: References,
}

impl ForeignKeyInput {
    pub fn new(columns: impl Into<MaybeArray<String>>, references: impl Into<References>) -> Self {
        Self {
            columns: columns.into(),
            references: references.into(),
        }
    }

    /// Resolves the foreign key of `table`.
    ///
    /// Only the local columns are checked here; references to other tables are checked once
    /// every table is resolved.
    pub(crate) fn resolve(self, table: &str, columns: &DbColumns) -> SchemaResult<ForeignKey> {
        let local_columns = self.columns.into_vec();
        let references = self.references.evaluate();

        if local_columns.is_empty() || references.is_empty() {
            return Err(SchemaError::EmptyForeignKey {
                table: table.to_string(),
            });
        }
        if local_columns.len() != references.len() {
            return Err(SchemaError::ForeignKeyArity {
                table: table.to_string(),
                columns: local_columns.len(),
                references: references.len(),
            });
        }
        if let Some(unknown) = local_columns
            .iter()
            .find(|column| !columns.contains_key(column.as_str()))
        {
            return Err(SchemaError::UnknownColumn {
                table: table.to_string(),
                column: unknown.clone(),
                context: "foreign key",
            });
        }

        Ok(ForeignKey {
            columns: local_columns,
            references,
        })
    }
}

/// A resolved foreign key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub columns: Vec<String>,
    pub references: Vec<ColumnRef>,
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::schema::{ColumnInput, column};

    fn post_columns() -> DbColumns {
        [
            ("id", ColumnInput::from(column::number().primary_key())),
            ("author_id", column::number().into()),
            ("author_name", column::text().into()),
        ]
        .into_iter()
        .map(|(name, column)| {
            (
                name.to_string(),
                column.resolve("Post", name).expect("failed to resolve"),
            )
        })
        .collect()
    }

    #[test]
    fn test_should_parse_column_ref() {
        let column: ColumnRef = "Author.id".parse().expect("failed to parse");
        assert_eq!(column, ColumnRef::new("Author", "id"));
        assert_eq!(column.to_string(), "Author.id");

        for invalid in ["Author", ".id", "Author.", "a.b.c"] {
            assert_eq!(
                invalid.parse::<ColumnRef>(),
                Err(SchemaError::InvalidColumnRef(invalid.to_string()))
            );
        }
    }

    #[test]
    fn test_should_deserialize_column_ref_from_string_or_map() {
        let from_str: ColumnRef = serde_json::from_str(r#""Author.id""#).expect("failed to parse");
        let from_map: ColumnRef = serde_json::from_str(r#"{ "table": "Author", "column": "id" }"#)
            .expect("failed to parse");
        assert_eq!(from_str, from_map);
    }

    #[test]
    fn test_should_deserialize_list_of_references() {
        let references: References =
            serde_json::from_str(r#"["Author.id", "Author.name"]"#).expect("failed to parse");
        assert_eq!(
            references.evaluate(),
            vec![
                ColumnRef::new("Author", "id"),
                ColumnRef::new("Author", "name")
            ]
        );
    }

    #[test]
    fn test_should_evaluate_deferred_references() {
        let references = References::deferred(|| ColumnRef::new("Author", "id").into());
        assert_eq!(references.evaluate(), vec![ColumnRef::new("Author", "id")]);
        assert_eq!(format!("{references:?}"), "Deferred(..)");

        let json = serde_json::to_value(&references).expect("failed to serialize");
        assert_eq!(json, serde_json::json!("Author.id"));
    }

    #[test]
    fn test_should_compare_deferred_references_without_evaluating() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let deferred = References::deferred(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            ColumnRef::new("Author", "id").into()
        });
        let columns = References::from(ColumnRef::new("Author", "id"));

        assert_eq!(deferred, deferred.clone());
        assert_ne!(deferred, References::deferred(|| ColumnRef::new("Author", "id").into()));
        assert_ne!(deferred, columns);
        assert_eq!(columns, References::from(ColumnRef::new("Author", "id")));
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_should_resolve_foreign_key() {
        let fk = ForeignKeyInput::new(
            vec!["author_id", "author_name"],
            vec![
                ColumnRef::new("Author", "id"),
                ColumnRef::new("Author", "name"),
            ],
        )
        .resolve("Post", &post_columns())
        .expect("failed to resolve");

        assert_eq!(fk.columns, vec!["author_id", "author_name"]);
        assert_eq!(fk.references.len(), 2);
    }

    #[test]
    fn test_should_not_resolve_foreign_key_with_different_arity() {
        let result = ForeignKeyInput::new(
            vec!["author_id", "author_name"],
            ColumnRef::new("Author", "id"),
        )
        .resolve("Post", &post_columns());
        assert_eq!(
            result,
            Err(SchemaError::ForeignKeyArity {
                table: "Post".to_string(),
                columns: 2,
                references: 1,
            })
        );
    }

    #[test]
    fn test_should_not_resolve_foreign_key_on_unknown_column() {
        let result = ForeignKeyInput::new("editor_id", ColumnRef::new("Author", "id"))
            .resolve("Post", &post_columns());
        assert!(matches!(
            result,
            Err(SchemaError::UnknownColumn { column, context: "foreign key", .. }) if column == "editor_id"
        ));
    }

    #[test]
    fn test_should_not_resolve_empty_foreign_key() {
        let result = ForeignKeyInput::new(Vec::<String>::new(), Vec::<ColumnRef>::new())
            .resolve("Post", &post_columns());
        assert!(matches!(result, Err(SchemaError::EmptyForeignKey { .. })));
    }
}
