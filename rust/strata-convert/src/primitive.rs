//! Leaf converters: one variant per scalar target kind.

use strata_common::{Result, error::Error};
use strata_record::{ByteArray, Value};

use crate::{
    dictionary::{Dictionary, DictionaryTable, decode_utf8},
    sink::ValueSink,
};

/// A primitive decode event delivered to a leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PrimitiveEvent<'a> {
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    Binary(&'a [u8]),
    /// A dictionary id, to be resolved against the leaf's dictionary.
    DictionaryId(u32),
}

impl PrimitiveEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveEvent::Int32(_) => "int32",
            PrimitiveEvent::Int64(_) => "int64",
            PrimitiveEvent::Float(_) => "float",
            PrimitiveEvent::Double(_) => "double",
            PrimitiveEvent::Boolean(_) => "boolean",
            PrimitiveEvent::Binary(_) => "binary",
            PrimitiveEvent::DictionaryId(_) => "dictionary id",
        }
    }
}

/// Converts primitive decode events into scalar values.
///
/// Each variant accepts only the events relevant to its kind. Booleans and
/// ints are interchangeable: a boolean leaf accepts `int32` (`v != 0`) and an
/// int leaf accepts `boolean` (`1` or `0`).
#[derive(Debug)]
pub enum PrimitiveConverter {
    String(StringConverter),
    ByteArray,
    Int,
    Long,
    Float,
    Double,
    Boolean,
}

impl PrimitiveConverter {
    pub fn kind_name(&self) -> &'static str {
        match self {
            PrimitiveConverter::String(_) => "chararray",
            PrimitiveConverter::ByteArray => "bytearray",
            PrimitiveConverter::Int => "int",
            PrimitiveConverter::Long => "long",
            PrimitiveConverter::Float => "float",
            PrimitiveConverter::Double => "double",
            PrimitiveConverter::Boolean => "boolean",
        }
    }

    pub fn has_dictionary_support(&self) -> bool {
        matches!(self, PrimitiveConverter::String(_))
    }

    /// Converts `event` and publishes the result to `sink`.
    pub fn add(&mut self, event: PrimitiveEvent<'_>, sink: &mut dyn ValueSink) -> Result<()> {
        let value = match (self, event) {
            (PrimitiveConverter::Boolean, PrimitiveEvent::Boolean(v)) => Value::Boolean(v),
            (PrimitiveConverter::Boolean, PrimitiveEvent::Int32(v)) => Value::Boolean(v != 0),
            (PrimitiveConverter::Int, PrimitiveEvent::Int32(v)) => Value::Int(v),
            (PrimitiveConverter::Int, PrimitiveEvent::Boolean(v)) => Value::Int(i32::from(v)),
            (PrimitiveConverter::Long, PrimitiveEvent::Int64(v)) => Value::Long(v),
            (PrimitiveConverter::Float, PrimitiveEvent::Float(v)) => Value::Float(v),
            (PrimitiveConverter::Double, PrimitiveEvent::Double(v)) => Value::Double(v),
            (PrimitiveConverter::ByteArray, PrimitiveEvent::Binary(v)) => {
                Value::ByteArray(ByteArray::copy_from(v))
            }
            (PrimitiveConverter::String(_), PrimitiveEvent::Binary(v)) => {
                Value::CharArray(decode_utf8(v))
            }
            (PrimitiveConverter::String(converter), PrimitiveEvent::DictionaryId(id)) => {
                converter.lookup(id)?
            }
            (converter, event) => {
                return Err(Error::unexpected_event(converter.kind_name(), event.name()));
            }
        };
        sink.add(value)
    }

    pub fn set_dictionary(&mut self, dictionary: &dyn Dictionary) -> Result<()> {
        match self {
            PrimitiveConverter::String(converter) => converter.set_dictionary(dictionary),
            other => Err(Error::unexpected_event(other.kind_name(), "dictionary")),
        }
    }
}

/// String leaf with dictionary support.
///
/// When the column is dictionary encoded, every dictionary entry is decoded
/// once in [`set_dictionary`](Self::set_dictionary); subsequent occurrences of
/// an id share the decoded string.
#[derive(Debug)]
pub struct StringConverter {
    field_name: String,
    dictionary: Option<DictionaryTable>,
}

impl StringConverter {
    pub fn new(field_name: impl Into<String>) -> StringConverter {
        StringConverter {
            field_name: field_name.into(),
            dictionary: None,
        }
    }

    pub fn set_dictionary(&mut self, dictionary: &dyn Dictionary) -> Result<()> {
        if self.dictionary.is_some() {
            return Err(Error::dictionary_reassigned(&self.field_name));
        }
        self.dictionary = Some(DictionaryTable::decode(dictionary)?);
        Ok(())
    }

    pub fn dictionary(&self) -> Option<&DictionaryTable> {
        self.dictionary.as_ref()
    }

    fn lookup(&self, id: u32) -> Result<Value> {
        let table = self.dictionary.as_ref().ok_or_else(|| {
            Error::invalid_operation(format!(
                "dictionary lookup before dictionary was set (field '{}')",
                self.field_name
            ))
        })?;
        table.get(id).map(Value::CharArray)
    }
}
