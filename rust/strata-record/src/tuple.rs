//! Fixed-arity record.

use itertools::Itertools;

use crate::{error::RecordError, value::Value};

/// A fixed-arity sequence of optional values.
///
/// The arity is chosen at construction and never changes; assignment outside
/// of it is rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tuple {
    fields: Vec<Option<Value>>,
}

impl Tuple {
    /// Creates a tuple of `size` absent fields.
    pub fn new(size: usize) -> Tuple {
        Tuple {
            fields: vec![None; size],
        }
    }

    /// Creates a single-field tuple holding `value`.
    pub fn single(value: Value) -> Tuple {
        Tuple {
            fields: vec![Some(value)],
        }
    }

    pub fn from_values(values: impl IntoIterator<Item = Option<Value>>) -> Tuple {
        Tuple {
            fields: values.into_iter().collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.fields.len()
    }

    /// Returns the value at `index`, or `None` if the slot is absent or out of range.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.fields.get(index).and_then(Option::as_ref)
    }

    /// Whether the slot at `index` exists and holds no value.
    pub fn is_absent(&self, index: usize) -> bool {
        matches!(self.fields.get(index), Some(None))
    }

    /// Assigns `value` to the slot at `index`, replacing any previous value.
    pub fn set(&mut self, index: usize, value: Value) -> Result<(), RecordError> {
        *self.slot_mut(index)? = Some(value);
        Ok(())
    }

    /// Returns the slot at `index` for in-place assignment.
    pub fn slot_mut(&mut self, index: usize) -> Result<&mut Option<Value>, RecordError> {
        let size = self.fields.len();
        self.fields
            .get_mut(index)
            .ok_or(RecordError::IndexOutOfBounds { index, size })
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Value>> {
        self.fields.iter().map(Option::as_ref)
    }

    pub fn into_values(self) -> Vec<Option<Value>> {
        self.fields
    }
}

impl std::fmt::Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({})",
            self.fields
                .iter()
                .map(|v| v.as_ref().map(ToString::to_string).unwrap_or_default())
                .join(",")
        )
    }
}
