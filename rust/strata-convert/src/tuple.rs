//! Converter assembling a group into a tuple.

use strata_common::{Result, error::Error};
use strata_record::{Tuple, Value};
use strata_schema::{
    source::{GroupType, PrimitiveTypeName, Repetition, Type},
    target::Schema,
};

use crate::{
    converter::{Converter, GroupConverter, no_such_child},
    options::ConverterOptions,
    sink::{TupleSlot, ValueSink, set_slot},
};

/// Converts a group into a tuple with one slot per field.
///
/// `start` allocates a fresh tuple (pre-filling zero defaults when enabled)
/// and child events set individual slots. A nested tuple is moved into its
/// parent's sink at `end`; the root tuple stays in place for the assembler.
#[derive(Debug)]
pub struct TupleConverter {
    converters: Vec<Converter>,
    /// Slots filled with zero at `start`, computed once at construction.
    zero_defaults: Vec<(usize, Value)>,
    current: Option<Tuple>,
}

impl TupleConverter {
    /// Builds the converter for the fields of `source`, assembled as `target`.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` if the field counts disagree at any level, or
    /// `UnsupportedFieldKind` for target kinds without a converter.
    pub fn new(
        source: &GroupType,
        target: &Schema,
        options: &ConverterOptions,
    ) -> Result<TupleConverter> {
        if source.field_count() != target.len() {
            return Err(Error::schema_mismatch(
                format!(
                    "schema sizes don't match: {} != {}",
                    source.field_count(),
                    target.len()
                ),
                source,
                target,
            ));
        }

        let converters = target
            .fields()
            .iter()
            .zip(source.fields())
            .map(|(field, source_field)| Converter::new(field, source_field, options))
            .collect::<Result<Vec<_>>>()?;

        let zero_defaults = if options.numbers_default_to_zero {
            zero_defaults(source)
        } else {
            Vec::new()
        };

        Ok(TupleConverter {
            converters,
            zero_defaults,
            current: None,
        })
    }

    /// Drops the zero defaults of this tuple only; nested converters keep
    /// theirs.
    pub(crate) fn without_zero_defaults(mut self) -> TupleConverter {
        self.zero_defaults.clear();
        self
    }

    pub fn field_count(&self) -> usize {
        self.converters.len()
    }

    pub fn converter(&self, index: usize) -> Option<&Converter> {
        self.converters.get(index)
    }

    pub fn start(&mut self) -> Result<()> {
        let mut tuple = Tuple::new(self.converters.len());
        for (index, zero) in &self.zero_defaults {
            set_slot(&mut tuple, *index, zero.clone())?;
        }
        self.current = Some(tuple);
        Ok(())
    }

    /// Ends a nested tuple, moving it into `sink`.
    pub fn end(&mut self, sink: &mut dyn ValueSink) -> Result<()> {
        let tuple = self.take_tuple()?;
        sink.add(Value::Tuple(tuple))
    }

    /// Returns the tuple under assembly (or the last one finished, for the root).
    pub fn current_tuple(&self) -> Option<&Tuple> {
        self.current.as_ref()
    }

    pub(crate) fn take_tuple(&mut self) -> Result<Tuple> {
        self.current
            .take()
            .ok_or_else(|| Error::invalid_operation("tuple end without start"))
    }

    pub(crate) fn leaf_count(&self) -> usize {
        self.converters.iter().map(Converter::leaf_count).sum()
    }

    pub(crate) fn depth(&self) -> usize {
        1 + self
            .converters
            .iter()
            .map(Converter::depth)
            .max()
            .unwrap_or(0)
    }
}

impl GroupConverter for TupleConverter {
    fn with_child<R, F>(&mut self, index: usize, f: F) -> Result<R>
    where
        F: FnOnce(&mut Converter, &mut dyn ValueSink) -> Result<R>,
    {
        let count = self.converters.len();
        let child = self
            .converters
            .get_mut(index)
            .ok_or_else(|| no_such_child("tuple", index, count))?;
        f(child, &mut TupleSlot::new(&mut self.current, index))
    }
}

/// Zero values for the optional numeric primitive fields of `group`.
///
/// Optional boolean and binary fields are left out: absent stays absent.
fn zero_defaults(group: &GroupType) -> Vec<(usize, Value)> {
    group
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(index, field)| match field {
            Type::Primitive(primitive) if primitive.repetition() == Repetition::Optional => {
                let zero = match primitive.primitive_type_name() {
                    PrimitiveTypeName::Int32 => Value::Int(0),
                    PrimitiveTypeName::Int64 => Value::Long(0),
                    PrimitiveTypeName::Float => Value::Float(0.0),
                    PrimitiveTypeName::Double => Value::Double(0.0),
                    PrimitiveTypeName::Boolean | PrimitiveTypeName::Binary => return None,
                };
                Some((index, zero))
            }
            _ => None,
        })
        .collect()
}
