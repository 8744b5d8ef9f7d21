//! Columnar (source) schema: the shape of the data as stored.

use std::fmt;

/// Cardinality marker attached to every source field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    /// Exactly one value per parent.
    Required,
    /// Zero or one value per parent.
    Optional,
    /// Zero or more values per parent.
    Repeated,
}

impl Repetition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Repetition::Required => "required",
            Repetition::Optional => "optional",
            Repetition::Repeated => "repeated",
        }
    }
}

/// Physical storage type of a primitive column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTypeName {
    Int32,
    Int64,
    Float,
    Double,
    Boolean,
    Binary,
}

impl PrimitiveTypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveTypeName::Int32 => "int32",
            PrimitiveTypeName::Int64 => "int64",
            PrimitiveTypeName::Float => "float",
            PrimitiveTypeName::Double => "double",
            PrimitiveTypeName::Boolean => "boolean",
            PrimitiveTypeName::Binary => "binary",
        }
    }

    /// Whether the type is one of the fixed-width numeric kinds
    /// (`int32`, `int64`, `float`, `double`).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            PrimitiveTypeName::Int32
                | PrimitiveTypeName::Int64
                | PrimitiveTypeName::Float
                | PrimitiveTypeName::Double
        )
    }
}

/// Logical annotation refining the meaning of a physical type or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OriginalType {
    /// Binary column holding UTF-8 text.
    Utf8,
    /// Group holding a single repeated key/value group.
    Map,
    /// The repeated key/value group nested in a `Map` group.
    MapKeyValue,
    /// Group holding a single repeated element.
    List,
}

impl OriginalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OriginalType::Utf8 => "UTF8",
            OriginalType::Map => "MAP",
            OriginalType::MapKeyValue => "MAP_KEY_VALUE",
            OriginalType::List => "LIST",
        }
    }
}

/// A leaf column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveType {
    name: String,
    repetition: Repetition,
    primitive_type_name: PrimitiveTypeName,
    original_type: Option<OriginalType>,
}

impl PrimitiveType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    pub fn primitive_type_name(&self) -> PrimitiveTypeName {
        self.primitive_type_name
    }

    pub fn original_type(&self) -> Option<OriginalType> {
        self.original_type
    }
}

/// A nested group of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupType {
    name: String,
    repetition: Repetition,
    original_type: Option<OriginalType>,
    fields: Vec<Type>,
}

impl GroupType {
    pub fn new(
        repetition: Repetition,
        name: impl Into<String>,
        fields: Vec<Type>,
    ) -> GroupType {
        GroupType {
            name: name.into(),
            repetition,
            original_type: None,
            fields,
        }
    }

    /// Creates the root group of a file schema.
    pub fn message(name: impl Into<String>, fields: Vec<Type>) -> GroupType {
        GroupType::new(Repetition::Required, name, fields)
    }

    pub fn with_original_type(mut self, original_type: OriginalType) -> GroupType {
        self.original_type = Some(original_type);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn repetition(&self) -> Repetition {
        self.repetition
    }

    pub fn original_type(&self) -> Option<OriginalType> {
        self.original_type
    }

    pub fn fields(&self) -> &[Type] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, index: usize) -> Option<&Type> {
        self.fields.get(index)
    }

    /// Number of primitive columns in this group, recursively.
    pub fn primitive_count(&self) -> usize {
        self.fields
            .iter()
            .map(|field| match field {
                Type::Primitive(_) => 1,
                Type::Group(group) => group.primitive_count(),
            })
            .sum()
    }

    /// Nesting depth of this group: 1 for a group of primitives only.
    pub fn depth(&self) -> usize {
        1 + self
            .fields
            .iter()
            .filter_map(Type::as_group)
            .map(GroupType::depth)
            .max()
            .unwrap_or(0)
    }

    /// Writes every field on its own line, each preceded by a newline.
    fn write_fields(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        for field in &self.fields {
            f.write_str("\n")?;
            field.write_indented(f, indent)?;
        }
        Ok(())
    }
}

/// A node of the source schema tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Primitive(PrimitiveType),
    Group(GroupType),
}

impl Type {
    pub fn primitive(
        repetition: Repetition,
        primitive_type_name: PrimitiveTypeName,
        name: impl Into<String>,
    ) -> Type {
        Type::Primitive(PrimitiveType {
            name: name.into(),
            repetition,
            primitive_type_name,
            original_type: None,
        })
    }

    /// Shorthand for a UTF-8 annotated binary column.
    pub fn string(repetition: Repetition, name: impl Into<String>) -> Type {
        Type::primitive(repetition, PrimitiveTypeName::Binary, name)
            .with_original_type(OriginalType::Utf8)
    }

    pub fn group(repetition: Repetition, name: impl Into<String>, fields: Vec<Type>) -> Type {
        Type::Group(GroupType::new(repetition, name, fields))
    }

    pub fn with_original_type(self, original_type: OriginalType) -> Type {
        match self {
            Type::Primitive(mut primitive) => {
                primitive.original_type = Some(original_type);
                Type::Primitive(primitive)
            }
            Type::Group(group) => Type::Group(group.with_original_type(original_type)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Type::Primitive(primitive) => &primitive.name,
            Type::Group(group) => &group.name,
        }
    }

    pub fn repetition(&self) -> Repetition {
        match self {
            Type::Primitive(primitive) => primitive.repetition,
            Type::Group(group) => group.repetition,
        }
    }

    pub fn is_repetition(&self, repetition: Repetition) -> bool {
        self.repetition() == repetition
    }

    pub fn original_type(&self) -> Option<OriginalType> {
        match self {
            Type::Primitive(primitive) => primitive.original_type,
            Type::Group(group) => group.original_type,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveType> {
        match self {
            Type::Primitive(primitive) => Some(primitive),
            Type::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupType> {
        match self {
            Type::Group(group) => Some(group),
            Type::Primitive(_) => None,
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        match self {
            Type::Primitive(primitive) => write!(
                f,
                "{pad}{} {} {}",
                primitive.repetition.as_str(),
                primitive.primitive_type_name.as_str(),
                primitive.name,
            )?,
            Type::Group(group) => write!(
                f,
                "{pad}{} group {}",
                group.repetition.as_str(),
                group.name,
            )?,
        }
        if let Some(original_type) = self.original_type() {
            write!(f, " ({})", original_type.as_str())?;
        }
        match self {
            Type::Primitive(_) => f.write_str(";"),
            Type::Group(group) => {
                f.write_str(" {")?;
                group.write_fields(f, indent + 1)?;
                write!(f, "\n{pad}}}")
            }
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "message {} {{", self.name)?;
        self.write_fields(f, 1)?;
        f.write_str("\n}")
    }
}
