//! The upward-publish contract between a converter and its parent.

use strata_common::{Result, error::Error};
use strata_record::{Tuple, Value};

/// Receives completed values from a child converter.
///
/// A parent hands its child a `&mut dyn ValueSink` for the duration of a
/// single event; the child never holds on to it.
pub trait ValueSink {
    fn add(&mut self, value: Value) -> Result<()>;
}

/// Collects published values in order.
impl ValueSink for Vec<Value> {
    fn add(&mut self, value: Value) -> Result<()> {
        self.push(value);
        Ok(())
    }
}

/// Sets published values into a fixed slot of the tuple under assembly.
pub(crate) struct TupleSlot<'a> {
    tuple: &'a mut Option<Tuple>,
    index: usize,
}

impl<'a> TupleSlot<'a> {
    pub(crate) fn new(tuple: &'a mut Option<Tuple>, index: usize) -> TupleSlot<'a> {
        TupleSlot { tuple, index }
    }
}

impl ValueSink for TupleSlot<'_> {
    fn add(&mut self, value: Value) -> Result<()> {
        let tuple = self
            .tuple
            .as_mut()
            .ok_or_else(|| Error::invalid_operation("value published before tuple start"))?;
        set_slot(tuple, self.index, value)
    }
}

/// Assigns `value` to `tuple[index]`, wrapping a rejection with the offending
/// index and value.
pub(crate) fn set_slot(tuple: &mut Tuple, index: usize, value: Value) -> Result<()> {
    match tuple.slot_mut(index) {
        Ok(slot) => {
            *slot = Some(value);
            Ok(())
        }
        Err(e) => Err(Error::sink_assignment(index, value.to_string(), e)),
    }
}
