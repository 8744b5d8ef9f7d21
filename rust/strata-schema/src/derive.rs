//! Derivation of a record schema from a columnar schema.
//!
//! Used when the reader is not given an explicit record schema. The derived
//! schema has the same arity as the source at every level, so it is always
//! accepted when building a converter tree over the same source schema.
//!
//! Mapping rules:
//!
//! | source                                         | target                  |
//! |------------------------------------------------|-------------------------|
//! | `int32` / `int64` / `float` / `double`         | `int` / `long` / `float` / `double` |
//! | `boolean`                                      | `boolean`               |
//! | `binary (UTF8)`                                | `chararray`             |
//! | `binary`                                       | `bytearray`             |
//! | group `(MAP)`                                  | `map[value]`            |
//! | group `(LIST)` or group of one repeated field  | `{t: (...)}`            |
//! | any other group                                | `(...)`                 |

use strata_common::{Result, error::Error};

use crate::{
    source::{GroupType, OriginalType, PrimitiveType, PrimitiveTypeName, Repetition, Type},
    target::{DataType, FieldSchema, Schema},
};

/// Derives the record schema for the fields of `message`.
pub fn derive_target_schema(message: &GroupType) -> Result<Schema> {
    let schema = derive_group_fields(message)?;
    log::debug!("derived record schema ({schema}) from '{}'", message.name());
    Ok(schema)
}

fn derive_group_fields(group: &GroupType) -> Result<Schema> {
    let fields = group
        .fields()
        .iter()
        .map(|field| {
            if field.is_repetition(Repetition::Repeated) {
                return Err(Error::unsupported_field_kind(
                    field.name(),
                    "repeated field outside of a collection group",
                ));
            }
            derive_field(field)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Schema::new(fields))
}

/// Derives the target field for `field`, ignoring its own repetition.
fn derive_field(field: &Type) -> Result<FieldSchema> {
    let data_type = match field {
        Type::Primitive(primitive) => derive_primitive(primitive),
        Type::Group(group) => derive_group(group)?,
    };
    Ok(FieldSchema::named(field.name(), data_type))
}

fn derive_primitive(primitive: &PrimitiveType) -> DataType {
    match primitive.primitive_type_name() {
        PrimitiveTypeName::Int32 => DataType::Int,
        PrimitiveTypeName::Int64 => DataType::Long,
        PrimitiveTypeName::Float => DataType::Float,
        PrimitiveTypeName::Double => DataType::Double,
        PrimitiveTypeName::Boolean => DataType::Boolean,
        PrimitiveTypeName::Binary => {
            if primitive.original_type() == Some(OriginalType::Utf8) {
                DataType::CharArray
            } else {
                DataType::ByteArray
            }
        }
    }
}

fn derive_group(group: &GroupType) -> Result<DataType> {
    match group.original_type() {
        Some(OriginalType::Map) => derive_map(group),
        Some(OriginalType::List) => derive_bag(group),
        _ if group.field_count() == 1
            && group.fields()[0].is_repetition(Repetition::Repeated) =>
        {
            derive_bag(group)
        }
        _ => Ok(DataType::Tuple(derive_group_fields(group)?)),
    }
}

fn derive_bag(group: &GroupType) -> Result<DataType> {
    let [nested] = group.fields() else {
        return Err(Error::schema_mismatch(
            format!("bags have only one field, got {}", group.field_count()),
            group,
            "bag",
        ));
    };
    let tuple_schema = match nested {
        Type::Group(inner)
            if !matches!(
                inner.original_type(),
                Some(OriginalType::Map) | Some(OriginalType::List)
            ) =>
        {
            derive_group_fields(inner)?
        }
        // Primitive, map and list elements are wrapped in a single-field tuple.
        _ => Schema::new(vec![derive_field(nested)?]),
    };
    Ok(DataType::Bag(Schema::new(vec![FieldSchema::named(
        nested.name(),
        DataType::Tuple(tuple_schema),
    )])))
}

fn derive_map(group: &GroupType) -> Result<DataType> {
    let key_value = match group.fields() {
        [Type::Group(key_value)] if key_value.field_count() == 2 => key_value,
        _ => {
            return Err(Error::schema_mismatch(
                "maps hold a single key/value group with two fields",
                group,
                "map",
            ));
        }
    };
    let value = derive_field(&key_value.fields()[1])?;
    Ok(DataType::Map(Some(Schema::new(vec![value]))))
}
