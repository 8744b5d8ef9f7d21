//! Engine-facing entry point: builds the converter tree for a schema pair and
//! routes the depth-first decode events to it.

use strata_common::{Result, error::Error};
use strata_record::Tuple;
use strata_schema::{derive::derive_target_schema, source::GroupType, target::Schema};

use crate::{
    converter::GroupConverter, dictionary::Dictionary, options::ConverterOptions,
    primitive::PrimitiveEvent, tuple::TupleConverter,
};

/// Builder for a [`RecordAssembler`].
///
/// When no target schema is given, one is derived from the source schema.
#[derive(Debug, Clone)]
pub struct AssemblerBuilder<'a> {
    source: &'a GroupType,
    target: Option<Schema>,
    options: ConverterOptions,
}

impl<'a> AssemblerBuilder<'a> {
    /// Creates a builder reading records shaped as the `source` message.
    pub fn new(source: &'a GroupType) -> AssemblerBuilder<'a> {
        AssemblerBuilder {
            source,
            target: None,
            options: ConverterOptions::default(),
        }
    }

    /// Sets the record schema to assemble.
    pub fn with_target_schema(self, target: Schema) -> Self {
        Self {
            target: Some(target),
            ..self
        }
    }

    pub fn with_options(self, options: ConverterOptions) -> Self {
        Self { options, ..self }
    }

    pub fn with_numbers_default_to_zero(self, numbers_default_to_zero: bool) -> Self {
        Self {
            options: self
                .options
                .with_numbers_default_to_zero(numbers_default_to_zero),
            ..self
        }
    }

    /// Builds the converter tree.
    ///
    /// # Errors
    /// Returns `SchemaMismatch` or `UnsupportedFieldKind` if the target
    /// schema can't be assembled from the source.
    pub fn build(self) -> Result<RecordAssembler> {
        let target = match self.target {
            Some(target) => target,
            None => derive_target_schema(self.source)?,
        };
        let root = TupleConverter::new(self.source, &target, &self.options)?;
        log::debug!(
            "record assembler for '{}': {} leaves, depth {}",
            self.source.name(),
            root.leaf_count(),
            root.depth()
        );
        Ok(RecordAssembler {
            root,
            target,
            path: Vec::new(),
            in_record: false,
        })
    }
}

/// Assembles one top-level record per `start`/`end` pair.
///
/// Field indices in events are relative to the innermost open group. Open
/// groups are tracked as a path of field indices from the root, and every
/// event is routed along that path to exactly one converter.
#[derive(Debug)]
pub struct RecordAssembler {
    root: TupleConverter,
    target: Schema,
    /// Field indices of the currently open groups, outermost first.
    path: Vec<usize>,
    in_record: bool,
}

impl RecordAssembler {
    /// Starts a new record, discarding any partially assembled one.
    pub fn start(&mut self) -> Result<()> {
        self.path.clear();
        self.root.start()?;
        self.in_record = true;
        Ok(())
    }

    /// Ends the current record. The finished record stays available through
    /// [`current_record`](Self::current_record) until the next `start`.
    pub fn end(&mut self) -> Result<()> {
        self.verify_in_record("end")?;
        if !self.path.is_empty() {
            return Err(Error::invalid_operation(format!(
                "record end with {} open group(s)",
                self.path.len()
            )));
        }
        self.in_record = false;
        if log::log_enabled!(log::Level::Trace) {
            if let Some(record) = self.root.current_tuple() {
                log::trace!("record complete: {record}");
            }
        }
        Ok(())
    }

    /// Opens the group at `field` of the innermost open group.
    pub fn start_group(&mut self, field: usize) -> Result<()> {
        self.verify_in_record("start_group")?;
        self.root
            .descend(&self.path, field, |child, _| child.start())?;
        self.path.push(field);
        Ok(())
    }

    /// Closes the innermost open group, publishing its value to the parent.
    pub fn end_group(&mut self) -> Result<()> {
        self.verify_in_record("end_group")?;
        let field = self
            .path
            .pop()
            .ok_or_else(|| Error::invalid_operation("end_group without open group"))?;
        self.root
            .descend(&self.path, field, |child, sink| child.end(sink))
    }

    pub fn add_int32(&mut self, field: usize, value: i32) -> Result<()> {
        self.add(field, PrimitiveEvent::Int32(value))
    }

    pub fn add_int64(&mut self, field: usize, value: i64) -> Result<()> {
        self.add(field, PrimitiveEvent::Int64(value))
    }

    pub fn add_float(&mut self, field: usize, value: f32) -> Result<()> {
        self.add(field, PrimitiveEvent::Float(value))
    }

    pub fn add_double(&mut self, field: usize, value: f64) -> Result<()> {
        self.add(field, PrimitiveEvent::Double(value))
    }

    pub fn add_boolean(&mut self, field: usize, value: bool) -> Result<()> {
        self.add(field, PrimitiveEvent::Boolean(value))
    }

    pub fn add_binary(&mut self, field: usize, value: &[u8]) -> Result<()> {
        self.add(field, PrimitiveEvent::Binary(value))
    }

    /// Publishes the dictionary entry `id` of the string leaf at `field`.
    pub fn add_value_from_dictionary(&mut self, field: usize, id: u32) -> Result<()> {
        self.add(field, PrimitiveEvent::DictionaryId(id))
    }

    /// Delivers a primitive event to the leaf at `field` of the innermost open
    /// group.
    pub fn add(&mut self, field: usize, event: PrimitiveEvent<'_>) -> Result<()> {
        self.verify_in_record(event.name())?;
        self.root
            .descend(&self.path, field, |child, sink| child.add(event, sink))
    }

    /// Supplies the dictionary of the string leaf addressed by `leaf_path`
    /// (field indices from the root). Dictionaries may be set between records.
    ///
    /// # Errors
    /// `DictionaryReassigned` if the leaf already has a dictionary.
    pub fn set_dictionary(
        &mut self,
        leaf_path: &[usize],
        dictionary: &dyn Dictionary,
    ) -> Result<()> {
        let (&field, groups) = leaf_path
            .split_last()
            .ok_or_else(|| Error::invalid_arg("leaf_path", "empty path"))?;
        self.root.descend(groups, field, |leaf, _| {
            if !leaf.has_dictionary_support() {
                return Err(Error::invalid_arg(
                    "leaf_path",
                    format!("{} leaf has no dictionary support", leaf.kind_name()),
                ));
            }
            leaf.set_dictionary(dictionary)
        })
    }

    /// The last finished record, or `None` while a record is being assembled.
    pub fn current_record(&self) -> Option<&Tuple> {
        if self.in_record {
            None
        } else {
            self.root.current_tuple()
        }
    }

    /// Takes ownership of the last finished record.
    pub fn take_record(&mut self) -> Option<Tuple> {
        if self.in_record {
            None
        } else {
            self.root.take_tuple().ok()
        }
    }

    pub fn target_schema(&self) -> &Schema {
        &self.target
    }

    pub fn root(&self) -> &TupleConverter {
        &self.root
    }

    /// Number of groups currently open below the record.
    pub fn open_groups(&self) -> usize {
        self.path.len()
    }

    /// Number of leaf converters in the tree.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Number of group levels in the tree, counting the record itself.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    fn verify_in_record(&self, event: &str) -> Result<()> {
        if self.in_record {
            Ok(())
        } else {
            Err(Error::invalid_operation(format!("{event} outside of a record")))
        }
    }
}
