use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::{DbColumns, MaybeArray, SchemaError, SchemaResult, check_identifier};

/// An index, as authored in a config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInput {
    /// Columns covered by the index.
    pub on: MaybeArray<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    /// Name of the index; only read when indexes are given as a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl IndexInput {
    /// Creates an index on the given columns.
    pub fn on(columns: impl Into<MaybeArray<String>>) -> Self {
        Self {
            on: columns.into(),
            unique: None,
            name: None,
        }
    }

    /// Makes the index unique.
    pub fn unique(mut self) -> Self {
        self.unique = Some(true);
        self
    }

    /// Gives the index an explicit name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn resolve(self, table: &str, name: &str, columns: &DbColumns) -> SchemaResult<Index> {
        let on = self.on.into_vec();
        if on.is_empty() {
            return Err(SchemaError::EmptyIndex {
                table: table.to_string(),
                index: name.to_string(),
            });
        }
        if let Some(unknown) = on.iter().find(|column| !columns.contains_key(column.as_str())) {
            return Err(SchemaError::UnknownColumn {
                table: table.to_string(),
                column: unknown.clone(),
                context: "index",
            });
        }

        Ok(Index {
            on,
            unique: self.unique.unwrap_or(false),
        })
    }
}

/// The indexes of a table, as authored in a config.
///
/// Indexes are given either by name, or as a list where unnamed indexes get a generated name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexesInput {
    Map(BTreeMap<String, IndexInput>),
    List(Vec<IndexInput>),
}

impl Default for IndexesInput {
    fn default() -> Self {
        IndexesInput::List(Vec::new())
    }
}

impl IndexesInput {
    /// Adds an index; indexes given by name are turned into a list of named indexes.
    pub fn push(&mut self, index: IndexInput) {
        match self {
            IndexesInput::List(list) => list.push(index),
            IndexesInput::Map(map) => {
                let mut list = std::mem::take(map)
                    .into_iter()
                    .map(|(name, index)| index.named(name))
                    .collect::<Vec<_>>();
                list.push(index);
                *self = IndexesInput::List(list);
            }
        }
    }

    /// Resolves the indexes of `table`, whose columns are `columns`.
    pub(crate) fn resolve(self, table: &str, columns: &DbColumns) -> SchemaResult<Indexes> {
        let named = match self {
            IndexesInput::Map(map) => map.into_iter().collect::<Vec<_>>(),
            IndexesInput::List(list) => list
                .into_iter()
                .map(|index| {
                    let name = index
                        .name
                        .clone()
                        .unwrap_or_else(|| generate_index_name(table, index.on.as_slice()));
                    (name, index)
                })
                .collect(),
        };

        let mut indexes = Indexes::new();
        for (name, index) in named {
            check_identifier("index", &name)?;
            let index = index.resolve(table, &name, columns)?;
            if indexes.insert(name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateIndex {
                    table: table.to_string(),
                    index: name,
                });
            }
        }

        Ok(indexes)
    }
}

/// Generates the name of an unnamed index: `<table>_<sorted columns>_idx`.
fn generate_index_name(table: &str, on: &[String]) -> String {
    let mut columns = on.to_vec();
    columns.sort();
    format!("{table}_{}_idx", columns.join("_"))
}

/// A resolved index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub on: Vec<String>,
    #[serde(default)]
    pub unique: bool,
}

/// Resolved indexes of a table, by index name.
pub type Indexes = BTreeMap<String, Index>;
