//! In-memory record values produced by the assembly layer.
//!
//! A record is a [`Tuple`]: a fixed-arity sequence of optional [`Value`]s.
//! Values nest: a tuple slot may hold another tuple, a [`Bag`] (ordered
//! collection of tuples) or a [`Map`] (string-keyed values).
//!
//! Tuples are the only mutable container. Bags and maps are immutable
//! snapshots that are cheap to clone.

pub mod bag;
pub mod error;
pub mod map;
pub mod tuple;
pub mod value;

pub use bag::Bag;
pub use error::RecordError;
pub use map::Map;
pub use tuple::Tuple;
pub use value::{ByteArray, Value};
