//! Record (target) schema: the shape of the assembled values.

use itertools::Itertools;

/// Kind of a target field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    /// UTF-8 text.
    CharArray,
    /// Opaque byte blob.
    ByteArray,
    DateTime,
    BigInteger,
    BigDecimal,
    /// Fixed-arity record.
    Tuple(Schema),
    /// Ordered collection of tuples. The schema holds a single tuple field.
    Bag(Schema),
    /// String-keyed map. The optional schema holds a single value field.
    Map(Option<Schema>),
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "boolean",
            DataType::Int => "int",
            DataType::Long => "long",
            DataType::Float => "float",
            DataType::Double => "double",
            DataType::CharArray => "chararray",
            DataType::ByteArray => "bytearray",
            DataType::DateTime => "datetime",
            DataType::BigInteger => "biginteger",
            DataType::BigDecimal => "bigdecimal",
            DataType::Tuple(_) => "tuple",
            DataType::Bag(_) => "bag",
            DataType::Map(_) => "map",
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(
            self,
            DataType::Tuple(_) | DataType::Bag(_) | DataType::Map(_)
        )
    }

    /// Returns the nested schema of a composite type.
    pub fn schema(&self) -> Option<&Schema> {
        match self {
            DataType::Tuple(schema) | DataType::Bag(schema) => Some(schema),
            DataType::Map(schema) => schema.as_ref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataType::Tuple(schema) => write!(f, "({schema})"),
            DataType::Bag(schema) => write!(f, "{{{schema}}}"),
            DataType::Map(Some(schema)) => write!(f, "map[{schema}]"),
            DataType::Map(None) => f.write_str("map[]"),
            other => f.write_str(other.name()),
        }
    }
}

/// A single named (or anonymous) target field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    alias: Option<String>,
    data_type: DataType,
}

impl FieldSchema {
    pub fn new(alias: impl Into<Option<String>>, data_type: DataType) -> FieldSchema {
        FieldSchema {
            alias: alias.into(),
            data_type,
        }
    }

    pub fn named(alias: impl Into<String>, data_type: DataType) -> FieldSchema {
        FieldSchema::new(Some(alias.into()), data_type)
    }

    /// Creates a bag field whose elements are tuples of `tuple_schema`.
    pub fn bag(alias: impl Into<String>, tuple_schema: Schema) -> FieldSchema {
        FieldSchema::named(
            alias,
            DataType::Bag(Schema::new(vec![FieldSchema::named(
                "t",
                DataType::Tuple(tuple_schema),
            )])),
        )
    }

    /// Creates a map field with values described by `value`.
    pub fn map(alias: impl Into<String>, value: Option<FieldSchema>) -> FieldSchema {
        FieldSchema::named(alias, DataType::Map(value.map(|v| Schema::new(vec![v]))))
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The alias, or `"?"` for anonymous fields. Used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.alias().unwrap_or("?")
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.data_type.schema()
    }
}

impl std::fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias}: {}", self.data_type),
            None => write!(f, "{}", self.data_type),
        }
    }
}

/// An ordered list of target fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Schema {
        Schema { fields }
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldSchema> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fields.iter().join(", "))
    }
}
