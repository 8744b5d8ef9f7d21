//! Immutable ordered collection of tuples.

use std::sync::Arc;

use itertools::Itertools;

use crate::tuple::Tuple;

/// An ordered collection of tuples.
///
/// A bag is a snapshot: once built it cannot change, and clones share the
/// same storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Bag(Arc<[Tuple]>);

impl Bag {
    pub fn empty() -> Bag {
        Bag(Arc::from(Vec::new()))
    }

    pub fn from_tuples(tuples: impl IntoIterator<Item = Tuple>) -> Bag {
        Bag(tuples.into_iter().collect())
    }

    /// Moves the contents of `buffer` into a new bag, leaving `buffer` empty
    /// with its capacity intact.
    pub fn drain_from(buffer: &mut Vec<Tuple>) -> Bag {
        Bag(buffer.drain(..).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tuple> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tuple> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Tuple] {
        &self.0
    }
}

impl Default for Bag {
    fn default() -> Self {
        Bag::empty()
    }
}

impl<'a> IntoIterator for &'a Bag {
    type Item = &'a Tuple;
    type IntoIter = std::slice::Iter<'a, Tuple>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Display for Bag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{}}}", self.0.iter().join(","))
    }
}
