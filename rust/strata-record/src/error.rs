use thiserror::Error;

/// Rejection reported by a record container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("index {index} out of bounds for tuple of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("expected a tuple, got {actual}")]
    NotATuple { actual: &'static str },

    #[error("map entry without a key")]
    MissingMapKey,
}
