//! Strata Convert
//!
//! Assembles nested record values from the depth-first event stream of a
//! columnar decode engine.
//!
//! A [`RecordAssembler`](assembler::RecordAssembler) is built once per pair of
//! source (columnar) and target (record) schemas. It owns a tree of
//! [`Converter`](converter::Converter) nodes, one per target field, mirroring
//! both schemas. The engine then drives the assembler with `start`,
//! `start_group`, `add_*`, `end_group` and `end` calls; completed values flow
//! from leaves to their parents through [`ValueSink`](sink::ValueSink)s until
//! the root holds a finished record.

pub mod assembler;
pub mod collection;
pub mod converter;
pub mod dictionary;
pub mod options;
pub mod primitive;
pub mod sink;
pub mod tuple;

pub use assembler::{AssemblerBuilder, RecordAssembler};
pub use converter::Converter;
pub use dictionary::{Dictionary, PlainDictionary};
pub use options::ConverterOptions;
pub use sink::ValueSink;
