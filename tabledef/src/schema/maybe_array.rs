use serde::{Deserialize, Serialize};

use crate::schema::ColumnRef;

/// Either a single value or a list of values.
///
/// Used wherever a config accepts one column name as well as several of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaybeArray<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> MaybeArray<T> {
    /// Converts into a list of values.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            MaybeArray::One(value) => vec![value],
            MaybeArray::Many(values) => values,
        }
    }

    /// Returns the values as a slice.
    pub fn as_slice(&self) -> &[T] {
        match self {
            MaybeArray::One(value) => std::slice::from_ref(value),
            MaybeArray::Many(values) => values,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<&str> for MaybeArray<String> {
    fn from(value: &str) -> Self {
        MaybeArray::One(value.to_string())
    }
}

impl From<String> for MaybeArray<String> {
    fn from(value: String) -> Self {
        MaybeArray::One(value)
    }
}

impl From<Vec<String>> for MaybeArray<String> {
    fn from(values: Vec<String>) -> Self {
        MaybeArray::Many(values)
    }
}

impl From<Vec<&str>> for MaybeArray<String> {
    fn from(values: Vec<&str>) -> Self {
        MaybeArray::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for MaybeArray<String> {
    fn from(values: [&str; N]) -> Self {
        MaybeArray::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<ColumnRef> for MaybeArray<ColumnRef> {
    fn from(value: ColumnRef) -> Self {
        MaybeArray::One(value)
    }
}

impl From<Vec<ColumnRef>> for MaybeArray<ColumnRef> {
    fn from(values: Vec<ColumnRef>) -> Self {
        MaybeArray::Many(values)
    }
}
