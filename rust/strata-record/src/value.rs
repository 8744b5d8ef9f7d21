//! The value type stored in tuple slots.

use std::sync::Arc;

use crate::{bag::Bag, map::Map, tuple::Tuple};

/// A single record value.
///
/// Absent values are represented by `None` at the slot level rather than by
/// a dedicated variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// UTF-8 text. Shared so that dictionary-decoded strings are not copied
    /// per occurrence.
    CharArray(Arc<str>),
    ByteArray(ByteArray),
    Tuple(Tuple),
    Bag(Bag),
    Map(Map),
}

impl Value {
    /// Name of the value kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::CharArray(_) => "chararray",
            Value::ByteArray(_) => "bytearray",
            Value::Tuple(_) => "tuple",
            Value::Bag(_) => "bag",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::CharArray(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            Value::Bag(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::CharArray(v) => f.write_str(v),
            Value::ByteArray(v) => write!(f, "{v}"),
            Value::Tuple(v) => write!(f, "{v}"),
            Value::Bag(v) => write!(f, "{v}"),
            Value::Map(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::CharArray(v.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self {
        Value::CharArray(v)
    }
}

impl From<Tuple> for Value {
    fn from(v: Tuple) -> Self {
        Value::Tuple(v)
    }
}

impl From<Bag> for Value {
    fn from(v: Bag) -> Self {
        Value::Bag(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Value::Map(v)
    }
}

impl From<ByteArray> for Value {
    fn from(v: ByteArray) -> Self {
        Value::ByteArray(v)
    }
}

/// An owned byte blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteArray(Vec<u8>);

impl ByteArray {
    /// Copies `bytes` into a new blob.
    pub fn copy_from(bytes: &[u8]) -> ByteArray {
        ByteArray(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(bytes: Vec<u8>) -> Self {
        ByteArray(bytes)
    }
}

impl std::fmt::Display for ByteArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}
