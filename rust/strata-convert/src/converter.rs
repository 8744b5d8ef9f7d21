//! The converter tree node and its construction from a schema pair.

use strata_common::{Result, error::Error};
use strata_schema::{
    source::{GroupType, Type},
    target::{DataType, FieldSchema},
};

use crate::{
    collection::{BagConverter, MapConverter},
    dictionary::Dictionary,
    options::ConverterOptions,
    primitive::{PrimitiveConverter, PrimitiveEvent, StringConverter},
    sink::ValueSink,
    tuple::TupleConverter,
};

/// A node of the converter tree, handling the events of one target field.
#[derive(Debug)]
pub enum Converter {
    /// Scalar field; receives primitive events.
    Primitive(PrimitiveConverter),
    /// Nested fixed-arity record.
    Tuple(TupleConverter),
    /// Repeated field assembled into a bag of tuples.
    Bag(BagConverter),
    /// Repeated key/value field assembled into a map.
    Map(MapConverter),
}

impl Converter {
    /// Builds the converter for `field`, reading data shaped as `source`.
    ///
    /// # Errors
    /// - `SchemaMismatch` if the shapes of the two subtrees disagree.
    /// - `UnsupportedFieldKind` if the target kind has no converter.
    pub fn new(
        field: &FieldSchema,
        source: &Type,
        options: &ConverterOptions,
    ) -> Result<Converter> {
        let converter = match field.data_type() {
            DataType::Tuple(schema) => Converter::Tuple(TupleConverter::new(
                expect_group(field, source)?,
                schema,
                options,
            )?),
            DataType::Bag(_) => {
                Converter::Bag(BagConverter::new(expect_group(field, source)?, field, options)?)
            }
            DataType::Map(_) => {
                Converter::Map(MapConverter::new(expect_group(field, source)?, field, options)?)
            }
            scalar => {
                if !source.is_primitive() {
                    return Err(Error::schema_mismatch(
                        format!("scalar field '{}' over a group", field.display_name()),
                        source,
                        field,
                    ));
                }
                Converter::Primitive(match scalar {
                    DataType::CharArray => {
                        PrimitiveConverter::String(StringConverter::new(field.display_name()))
                    }
                    DataType::ByteArray => PrimitiveConverter::ByteArray,
                    DataType::Int => PrimitiveConverter::Int,
                    DataType::Long => PrimitiveConverter::Long,
                    DataType::Float => PrimitiveConverter::Float,
                    DataType::Double => PrimitiveConverter::Double,
                    DataType::Boolean => PrimitiveConverter::Boolean,
                    unsupported => {
                        return Err(Error::unsupported_field_kind(
                            field.display_name(),
                            unsupported.name(),
                        ));
                    }
                })
            }
        };
        log::debug!(
            "converter for '{}' ({}): {}",
            field.display_name(),
            field.data_type().name(),
            converter.kind_name()
        );
        Ok(converter)
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Converter::Primitive(primitive) => primitive.kind_name(),
            Converter::Tuple(_) => "tuple",
            Converter::Bag(_) => "bag",
            Converter::Map(_) => "map",
        }
    }

    /// Starts a new value of a group field.
    pub fn start(&mut self) -> Result<()> {
        match self {
            Converter::Tuple(tuple) => tuple.start(),
            Converter::Bag(bag) => {
                bag.start();
                Ok(())
            }
            Converter::Map(map) => {
                map.start();
                Ok(())
            }
            Converter::Primitive(primitive) => {
                Err(Error::unexpected_event(primitive.kind_name(), "start"))
            }
        }
    }

    /// Ends the current value of a group field and publishes it to `sink`.
    pub fn end(&mut self, sink: &mut dyn ValueSink) -> Result<()> {
        match self {
            Converter::Tuple(tuple) => tuple.end(sink),
            Converter::Bag(bag) => bag.end(sink),
            Converter::Map(map) => map.end(sink),
            Converter::Primitive(primitive) => {
                Err(Error::unexpected_event(primitive.kind_name(), "end"))
            }
        }
    }

    /// Delivers a primitive event to a leaf.
    pub fn add(&mut self, event: PrimitiveEvent<'_>, sink: &mut dyn ValueSink) -> Result<()> {
        match self {
            Converter::Primitive(primitive) => primitive.add(event, sink),
            other => Err(Error::unexpected_event(other.kind_name(), event.name())),
        }
    }

    pub fn set_dictionary(&mut self, dictionary: &dyn Dictionary) -> Result<()> {
        match self {
            Converter::Primitive(primitive) => primitive.set_dictionary(dictionary),
            other => Err(Error::unexpected_event(other.kind_name(), "dictionary")),
        }
    }

    pub fn has_dictionary_support(&self) -> bool {
        match self {
            Converter::Primitive(primitive) => primitive.has_dictionary_support(),
            _ => false,
        }
    }

    /// Number of leaf converters in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Converter::Primitive(_) => 1,
            Converter::Tuple(tuple) => tuple.leaf_count(),
            Converter::Bag(bag) => bag.child().leaf_count(),
            Converter::Map(map) => map.key_value().leaf_count(),
        }
    }

    /// Number of group levels in this subtree; 0 for a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Converter::Primitive(_) => 0,
            Converter::Tuple(tuple) => tuple.depth(),
            Converter::Bag(bag) => 1 + bag.child().depth(),
            Converter::Map(map) => 1 + map.key_value().depth(),
        }
    }
}

fn expect_group<'a>(field: &FieldSchema, source: &'a Type) -> Result<&'a GroupType> {
    source.as_group().ok_or_else(|| {
        Error::schema_mismatch(
            format!(
                "{} field '{}' over a primitive column",
                field.data_type().name(),
                field.display_name()
            ),
            source,
            field,
        )
    })
}

/// A converter with child converters, addressed by field index.
pub trait GroupConverter {
    /// Runs `f` on the child at `index`, together with the sink that child
    /// publishes into.
    fn with_child<R, F>(&mut self, index: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut Converter, &mut dyn ValueSink) -> Result<R>;

    /// Runs `f` on the converter for `field` inside the group reached by
    /// following `path` (a list of field indices) from this group.
    fn descend<R, F>(&mut self, path: &[usize], field: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut Converter, &mut dyn ValueSink) -> Result<R>,
    {
        match path.split_first() {
            None => self.with_child(field, f),
            Some((&head, rest)) => self.with_child(head, |child, _| child.descend(rest, field, f)),
        }
    }
}

impl GroupConverter for Converter {
    fn with_child<R, F>(&mut self, index: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut Converter, &mut dyn ValueSink) -> Result<R>,
    {
        match self {
            Converter::Tuple(tuple) => tuple.with_child(index, f),
            Converter::Bag(bag) => bag.with_child(index, f),
            Converter::Map(map) => map.with_child(index, f),
            Converter::Primitive(primitive) => Err(Error::unexpected_event(
                primitive.kind_name(),
                format!("child {index}"),
            )),
        }
    }
}

/// Error for a child index outside of a group.
pub(crate) fn no_such_child(group: &str, index: usize, count: usize) -> Error {
    Error::invalid_arg(
        "field index",
        format!("{group} has {count} field(s), can't reach {index}"),
    )
}
