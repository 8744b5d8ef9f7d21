//! Schema models for record assembly.
//!
//! Two independently shaped trees meet here:
//!
//! - [`source`]: the columnar schema produced by the storage decode engine
//!   (primitive physical types, groups, repetition markers).
//! - [`target`]: the record schema the assembled values must conform to
//!   (scalars, tuples, bags and maps).
//!
//! [`derive`] produces a target schema from a source schema when the caller
//! does not supply one.

pub mod derive;
pub mod source;
pub mod target;
