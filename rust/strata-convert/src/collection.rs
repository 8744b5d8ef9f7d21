//! Converters assembling repeated groups into bags and maps.

use std::sync::Arc;

use strata_common::{Result, error::Error};
use strata_record::{Bag, Map, RecordError, Tuple, Value};
use strata_schema::{
    source::{GroupType, OriginalType, Type},
    target::{DataType, FieldSchema, Schema},
};

use crate::{
    converter::{Converter, GroupConverter, no_such_child},
    options::ConverterOptions,
    sink::ValueSink,
    tuple::TupleConverter,
};

/// Converts a group with a single repeated field into a bag.
///
/// Bags hold tuples only. When the repeated field is a primitive, a map or a
/// list, every element is wrapped in a single-field tuple on its way into the
/// buffer.
#[derive(Debug)]
pub struct BagConverter {
    child: Box<Converter>,
    wrap_elements: bool,
    buffer: Vec<Tuple>,
}

impl BagConverter {
    pub fn new(
        source: &GroupType,
        field: &FieldSchema,
        options: &ConverterOptions,
    ) -> Result<BagConverter> {
        let [nested] = source.fields() else {
            return Err(Error::schema_mismatch(
                format!(
                    "bags have only one field, '{}' has {}",
                    source.name(),
                    source.field_count()
                ),
                source,
                field,
            ));
        };

        let tuple_field = field
            .schema()
            .and_then(|schema| match schema.fields() {
                [tuple_field] => Some(tuple_field),
                _ => None,
            })
            .ok_or_else(|| {
                Error::schema_mismatch(
                    "bag schema must hold a single tuple field",
                    source,
                    field,
                )
            })?;

        let wrap_elements = nested.is_primitive()
            || matches!(
                nested.original_type(),
                Some(OriginalType::Map) | Some(OriginalType::List)
            );
        let child_field = if wrap_elements {
            tuple_field
                .schema()
                .and_then(|schema| schema.field(0))
                .ok_or_else(|| {
                    Error::schema_mismatch(
                        "bag tuple must describe the wrapped element",
                        nested,
                        tuple_field,
                    )
                })?
        } else {
            tuple_field
        };

        let child = Converter::new(child_field, nested, options)?;
        Ok(BagConverter {
            child: Box::new(child),
            wrap_elements,
            buffer: Vec::new(),
        })
    }

    pub fn child(&self) -> &Converter {
        &self.child
    }

    /// Whether child values are wrapped in single-field tuples.
    pub fn wraps_elements(&self) -> bool {
        self.wrap_elements
    }

    pub fn start(&mut self) {
        self.buffer.clear();
    }

    /// Publishes the buffered elements as a bag, leaving the buffer empty.
    pub fn end(&mut self, sink: &mut dyn ValueSink) -> Result<()> {
        let bag = Bag::drain_from(&mut self.buffer);
        sink.add(Value::Bag(bag))
    }
}

impl GroupConverter for BagConverter {
    fn with_child<R, F>(&mut self, index: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut Converter, &mut dyn ValueSink) -> Result<R>,
    {
        if index != 0 {
            return Err(no_such_child("bag", index, 1));
        }
        let mut sink = BagElementSink {
            buffer: &mut self.buffer,
            wrap: self.wrap_elements,
        };
        f(&mut self.child, &mut sink)
    }
}

struct BagElementSink<'a> {
    buffer: &'a mut Vec<Tuple>,
    wrap: bool,
}

impl ValueSink for BagElementSink<'_> {
    fn add(&mut self, value: Value) -> Result<()> {
        let tuple = match value {
            value if self.wrap => Tuple::single(value),
            Value::Tuple(tuple) => tuple,
            other => {
                return Err(Error::sink_assignment(
                    self.buffer.len(),
                    other.to_string(),
                    RecordError::NotATuple {
                        actual: other.kind_name(),
                    },
                ));
            }
        };
        self.buffer.push(tuple);
        Ok(())
    }
}

/// Converts a group holding a repeated key/value group into a map.
///
/// The key/value group is assembled by a two-field tuple converter whose
/// finished tuples become map entries.
#[derive(Debug)]
pub struct MapConverter {
    key_value: Box<Converter>,
    entries: Vec<(Arc<str>, Option<Value>)>,
}

impl MapConverter {
    pub fn new(
        source: &GroupType,
        field: &FieldSchema,
        options: &ConverterOptions,
    ) -> Result<MapConverter> {
        let key_value = match source.fields() {
            [Type::Group(key_value)] if key_value.field_count() == 2 => key_value,
            _ => {
                return Err(Error::schema_mismatch(
                    format!(
                        "map '{}' must hold a single key/value group with two fields",
                        source.name()
                    ),
                    source,
                    field,
                ));
            }
        };

        let value_field = match field.data_type() {
            DataType::Map(Some(schema)) => schema.field(0).cloned().ok_or_else(|| {
                Error::schema_mismatch("map value schema is empty", source, field)
            })?,
            _ => FieldSchema::named("value", DataType::ByteArray),
        };
        let key_value_schema = Schema::new(vec![
            FieldSchema::named("key", DataType::CharArray),
            value_field,
        ]);

        // An absent map value stays absent; tuples nested in the value still
        // get their zero defaults.
        let key_value =
            TupleConverter::new(key_value, &key_value_schema, options)?.without_zero_defaults();
        Ok(MapConverter {
            key_value: Box::new(Converter::Tuple(key_value)),
            entries: Vec::new(),
        })
    }

    pub fn key_value(&self) -> &Converter {
        &self.key_value
    }

    pub fn start(&mut self) {
        self.entries.clear();
    }

    /// Publishes the buffered entries as a map, leaving the buffer empty.
    pub fn end(&mut self, sink: &mut dyn ValueSink) -> Result<()> {
        let map = Map::drain_from(&mut self.entries);
        sink.add(Value::Map(map))
    }
}

impl GroupConverter for MapConverter {
    fn with_child<R, F>(&mut self, index: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut Converter, &mut dyn ValueSink) -> Result<R>,
    {
        if index != 0 {
            return Err(no_such_child("map", index, 1));
        }
        let mut sink = MapEntrySink {
            entries: &mut self.entries,
        };
        f(&mut self.key_value, &mut sink)
    }
}

struct MapEntrySink<'a> {
    entries: &'a mut Vec<(Arc<str>, Option<Value>)>,
}

impl ValueSink for MapEntrySink<'_> {
    fn add(&mut self, value: Value) -> Result<()> {
        let index = self.entries.len();
        let entry = match value {
            Value::Tuple(entry) => entry,
            other => {
                return Err(Error::sink_assignment(
                    index,
                    other.to_string(),
                    RecordError::NotATuple {
                        actual: other.kind_name(),
                    },
                ));
            }
        };
        let text = entry.to_string();
        let mut parts = entry.into_values().into_iter();
        let key = match parts.next().flatten() {
            Some(Value::CharArray(key)) => key,
            _ => return Err(Error::sink_assignment(index, text, RecordError::MissingMapKey)),
        };
        let value = parts.next().flatten();
        self.entries.push((key, value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use strata_common::error::ErrorKind;
    use strata_schema::source::{PrimitiveTypeName, Repetition};

    use super::*;
    use crate::primitive::PrimitiveEvent;

    fn string_bag() -> (GroupType, FieldSchema) {
        let source = GroupType::new(
            Repetition::Optional,
            "tags",
            vec![Type::string(Repetition::Repeated, "tag")],
        );
        let field = FieldSchema::bag(
            "tags".to_string(),
            Schema::new(vec![FieldSchema::named("tag", DataType::CharArray)]),
        );
        (source, field)
    }

    fn int_map() -> (GroupType, FieldSchema) {
        let source = GroupType::new(
            Repetition::Optional,
            "attrs",
            vec![
                Type::group(
                    Repetition::Repeated,
                    "key_value",
                    vec![
                        Type::string(Repetition::Required, "key"),
                        Type::primitive(Repetition::Optional, PrimitiveTypeName::Int32, "value"),
                    ],
                )
                .with_original_type(OriginalType::MapKeyValue),
            ],
        )
        .with_original_type(OriginalType::Map);
        let field = FieldSchema::map(
            "attrs".to_string(),
            Some(FieldSchema::named("value", DataType::Int)),
        );
        (source, field)
    }

    fn add_tag(bag: &mut BagConverter, tag: &str) {
        bag.with_child(0, |child, sink| {
            child.add(PrimitiveEvent::Binary(tag.as_bytes()), sink)
        })
        .unwrap();
    }

    #[test]
    fn test_bag_wraps_primitive_elements() {
        let (source, field) = string_bag();
        let mut bag = BagConverter::new(&source, &field, &ConverterOptions::default()).unwrap();
        assert!(bag.wraps_elements());
        assert_eq!(bag.child().kind_name(), "chararray");

        bag.start();
        for tag in ["x", "y", "z"] {
            add_tag(&mut bag, tag);
        }
        let mut out = Vec::new();
        bag.end(&mut out).unwrap();
        assert_eq!(out[0].to_string(), "{(x),(y),(z)}");
    }

    #[test]
    fn test_bag_buffer_reused_between_records() {
        let (source, field) = string_bag();
        let mut bag = BagConverter::new(&source, &field, &ConverterOptions::default()).unwrap();
        let mut out = Vec::new();

        bag.start();
        add_tag(&mut bag, "a");
        add_tag(&mut bag, "b");
        bag.end(&mut out).unwrap();

        bag.start();
        bag.end(&mut out).unwrap();

        bag.start();
        add_tag(&mut bag, "c");
        bag.end(&mut out).unwrap();

        let lengths = out
            .iter()
            .map(|v| v.as_bag().unwrap().len())
            .collect::<Vec<_>>();
        assert_eq!(lengths, [2, 0, 1]);
        assert_eq!(out[2].to_string(), "{(c)}");
    }

    #[test]
    fn test_bag_requires_single_field() {
        let source = GroupType::new(
            Repetition::Optional,
            "pair",
            vec![
                Type::string(Repetition::Repeated, "a"),
                Type::string(Repetition::Repeated, "b"),
            ],
        );
        let (_, field) = string_bag();
        let err = BagConverter::new(&source, &field, &ConverterOptions::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch { .. }));
    }

    #[test]
    fn test_bag_rejects_non_tuple_elements() {
        let mut buffer = Vec::new();
        let mut sink = BagElementSink {
            buffer: &mut buffer,
            wrap: false,
        };
        sink.add(Value::Tuple(Tuple::single(Value::Int(1)))).unwrap();
        let err = sink.add(Value::Int(2)).unwrap_err();
        match err.kind() {
            ErrorKind::SinkAssignment { index, value, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(value, "2");
            }
            other => panic!("unexpected kind {other:?}"),
        }
        assert_eq!(buffer.len(), 1);
    }

    fn add_entry(map: &mut MapConverter, key: Option<&str>, value: Option<i32>) {
        map.with_child(0, |key_value, sink| {
            key_value.start()?;
            if let Some(key) = key {
                key_value.with_child(0, |leaf, slot| {
                    leaf.add(PrimitiveEvent::Binary(key.as_bytes()), slot)
                })?;
            }
            if let Some(value) = value {
                key_value.with_child(1, |leaf, slot| leaf.add(PrimitiveEvent::Int32(value), slot))?;
            }
            key_value.end(sink)
        })
        .unwrap();
    }

    #[test]
    fn test_map_entries() {
        let (source, field) = int_map();
        let mut map = MapConverter::new(&source, &field, &ConverterOptions::default()).unwrap();
        assert_eq!(map.key_value().leaf_count(), 2);

        map.start();
        add_entry(&mut map, Some("b"), Some(3));
        add_entry(&mut map, Some("a"), None);
        let mut out = Vec::new();
        map.end(&mut out).unwrap();

        let result = out[0].as_map().unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.get("b"), Some(&Value::Int(3)));
        assert!(result.contains_key("a"));
        assert_eq!(result.get("a"), None);
        assert_eq!(out[0].to_string(), "[a#,b#3]");
    }

    #[test]
    fn test_map_values_never_default_to_zero() {
        let (source, field) = int_map();
        let options = ConverterOptions::new().with_numbers_default_to_zero(true);
        let mut map = MapConverter::new(&source, &field, &options).unwrap();
        map.start();
        add_entry(&mut map, Some("k"), None);
        let mut out = Vec::new();
        map.end(&mut out).unwrap();
        let result = out[0].as_map().unwrap();
        assert!(result.contains_key("k"));
        assert_eq!(result.get("k"), None);
    }

    #[test]
    fn test_tuple_map_values_get_zero_defaults() {
        let source = GroupType::new(
            Repetition::Optional,
            "attrs",
            vec![
                Type::group(
                    Repetition::Repeated,
                    "key_value",
                    vec![
                        Type::string(Repetition::Required, "key"),
                        Type::group(
                            Repetition::Optional,
                            "value",
                            vec![Type::primitive(
                                Repetition::Optional,
                                PrimitiveTypeName::Int32,
                                "n",
                            )],
                        ),
                    ],
                )
                .with_original_type(OriginalType::MapKeyValue),
            ],
        )
        .with_original_type(OriginalType::Map);
        let field = FieldSchema::map(
            "attrs".to_string(),
            Some(FieldSchema::named(
                "value",
                DataType::Tuple(Schema::new(vec![FieldSchema::named("n", DataType::Int)])),
            )),
        );
        let options = ConverterOptions::new().with_numbers_default_to_zero(true);
        let mut map = MapConverter::new(&source, &field, &options).unwrap();

        map.start();
        map.with_child(0, |key_value, sink| {
            key_value.start()?;
            key_value.with_child(0, |leaf, slot| leaf.add(PrimitiveEvent::Binary(b"k"), slot))?;
            key_value.with_child(1, |value, slot| {
                value.start()?;
                value.end(slot)
            })?;
            key_value.end(sink)
        })
        .unwrap();
        let mut out = Vec::new();
        map.end(&mut out).unwrap();

        let value = out[0].as_map().unwrap().get("k").and_then(Value::as_tuple).unwrap();
        assert_eq!(value.get(0), Some(&Value::Int(0)));
        assert_eq!(out[0].to_string(), "[k#(0)]");
    }

    #[test]
    fn test_map_rejects_missing_key() {
        let (source, field) = int_map();
        let mut map = MapConverter::new(&source, &field, &ConverterOptions::default()).unwrap();
        map.start();
        let err = map
            .with_child(0, |key_value, sink| {
                key_value.start()?;
                key_value.with_child(1, |leaf, slot| leaf.add(PrimitiveEvent::Int32(7), slot))?;
                key_value.end(sink)
            })
            .unwrap_err();
        match err.kind() {
            ErrorKind::SinkAssignment { index, value, .. } => {
                assert_eq!(*index, 0);
                assert_eq!(value, "(,7)");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn test_untyped_map_values_are_bytes() {
        let (source, _) = int_map();
        let field = FieldSchema::map("attrs".to_string(), None);
        let map = MapConverter::new(&source, &field, &ConverterOptions::default()).unwrap();
        let Converter::Tuple(key_value) = map.key_value() else {
            panic!("key/value converter must be a tuple");
        };
        assert_eq!(key_value.converter(1).unwrap().kind_name(), "bytearray");
    }

    #[test]
    fn test_map_requires_key_value_group() {
        let source = GroupType::new(
            Repetition::Optional,
            "attrs",
            vec![Type::string(Repetition::Repeated, "key")],
        )
        .with_original_type(OriginalType::Map);
        let (_, field) = int_map();
        let err = MapConverter::new(&source, &field, &ConverterOptions::default()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch { .. }));
    }
}
