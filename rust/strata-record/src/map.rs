//! Immutable string-keyed map.

use std::sync::Arc;

use ahash::AHashMap;
use itertools::Itertools;

use crate::value::Value;

/// A map from string keys to optional values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map(Arc<AHashMap<Arc<str>, Option<Value>>>);

impl Map {
    /// Builds a map from `entries`. Later entries replace earlier ones with
    /// the same key.
    pub fn from_entries(entries: impl IntoIterator<Item = (Arc<str>, Option<Value>)>) -> Map {
        Map(Arc::new(entries.into_iter().collect()))
    }

    /// Moves the contents of `buffer` into a new map, leaving `buffer` empty
    /// with its capacity intact.
    pub fn drain_from(buffer: &mut Vec<(Arc<str>, Option<Value>)>) -> Map {
        Map::from_entries(buffer.drain(..))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the value for `key`; `None` when the key is missing or its
    /// value is absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v.as_ref()))
    }
}

impl std::fmt::Display for Map {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self
            .0
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(k, v)| {
                format!(
                    "{k}#{}",
                    v.as_ref().map(ToString::to_string).unwrap_or_default()
                )
            })
            .join(",");
        write!(f, "[{entries}]")
    }
}
