//! Event-replay helpers shared by the assembly tests.

#![allow(dead_code)]

use strata_common::Result;
use strata_convert::RecordAssembler;
use strata_record::Tuple;

/// One decode event, as emitted by a columnar decode engine.
#[derive(Debug, Clone)]
pub enum Event {
    Start,
    End,
    StartGroup(usize),
    EndGroup,
    Int32(usize, i32),
    Int64(usize, i64),
    Float(usize, f32),
    Double(usize, f64),
    Boolean(usize, bool),
    Binary(usize, Vec<u8>),
    DictionaryId(usize, u32),
}

impl Event {
    pub fn text(field: usize, text: &str) -> Event {
        Event::Binary(field, text.as_bytes().to_vec())
    }
}

/// Feeds `events` to `assembler` in order, stopping at the first error.
pub fn replay(assembler: &mut RecordAssembler, events: &[Event]) -> Result<()> {
    for event in events {
        match event {
            Event::Start => assembler.start()?,
            Event::End => assembler.end()?,
            Event::StartGroup(field) => assembler.start_group(*field)?,
            Event::EndGroup => assembler.end_group()?,
            Event::Int32(field, v) => assembler.add_int32(*field, *v)?,
            Event::Int64(field, v) => assembler.add_int64(*field, *v)?,
            Event::Float(field, v) => assembler.add_float(*field, *v)?,
            Event::Double(field, v) => assembler.add_double(*field, *v)?,
            Event::Boolean(field, v) => assembler.add_boolean(*field, *v)?,
            Event::Binary(field, v) => assembler.add_binary(*field, v)?,
            Event::DictionaryId(field, id) => assembler.add_value_from_dictionary(*field, *id)?,
        }
    }
    Ok(())
}

/// Replays a single record and takes it out of the assembler.
pub fn assemble(assembler: &mut RecordAssembler, events: &[Event]) -> Tuple {
    replay(assembler, events).unwrap();
    assembler.take_record().unwrap()
}
