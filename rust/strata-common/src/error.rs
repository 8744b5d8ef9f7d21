use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

pub type StdErrorBoxed = Box<dyn std::error::Error + Send + Sync + 'static>;

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    /// Source and target schema subtrees disagree in shape.
    ///
    /// Both subtrees are captured in their rendered form so that the message
    /// is self-contained after the schemas themselves are dropped.
    pub fn schema_mismatch(
        message: impl Into<String>,
        source_schema: impl ToString,
        target_schema: impl ToString,
    ) -> Error {
        Error(
            ErrorKind::SchemaMismatch {
                message: message.into(),
                source_schema: source_schema.to_string(),
                target_schema: target_schema.to_string(),
            }
            .into(),
        )
    }

    pub fn unsupported_field_kind(field: impl Into<String>, kind: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnsupportedFieldKind {
                field: field.into(),
                kind: kind.into(),
            }
            .into(),
        )
    }

    pub fn dictionary_reassigned(field: impl Into<String>) -> Error {
        Error(
            ErrorKind::DictionaryReassigned {
                field: field.into(),
            }
            .into(),
        )
    }

    pub fn sink_assignment<E>(index: usize, value: impl Into<String>, source: E) -> Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error(
            ErrorKind::SinkAssignment {
                index,
                value: value.into(),
                source: Box::new(source),
            }
            .into(),
        )
    }

    pub fn unexpected_event(converter: impl Into<String>, event: impl Into<String>) -> Error {
        Error(
            ErrorKind::UnexpectedEvent {
                converter: converter.into(),
                event: event.into(),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("schema mismatch: {message}\nsource:\n{source_schema}\ntarget:\n{target_schema}")]
    SchemaMismatch {
        message: String,
        source_schema: String,
        target_schema: String,
    },

    #[error("unsupported field kind {kind} for field '{field}'")]
    UnsupportedFieldKind { field: String, kind: String },

    #[error("dictionary can be set only once (field '{field}')")]
    DictionaryReassigned { field: String },

    #[error("could not set {value} at index {index}: {source}")]
    SinkAssignment {
        index: usize,
        value: String,
        source: StdErrorBoxed,
    },

    #[error("{converter} converter does not accept {event}")]
    UnexpectedEvent { converter: String, event: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_message_carries_both_schemas() {
        let err = Error::schema_mismatch("field count 2 != 1", "a: int32", "a: int");
        let text = err.to_string();
        assert!(text.contains("field count 2 != 1"));
        assert!(text.contains("a: int32"));
        assert!(text.contains("a: int"));
        assert!(matches!(err.kind(), ErrorKind::SchemaMismatch { .. }));
    }

    #[test]
    fn test_sink_assignment_keeps_source() {
        let io = std::io::Error::other("slot rejected");
        let err = Error::sink_assignment(3, "42", io);
        match err.into_kind() {
            ErrorKind::SinkAssignment {
                index,
                value,
                source,
            } => {
                assert_eq!(index, 3);
                assert_eq!(value, "42");
                assert_eq!(source.to_string(), "slot rejected");
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }
}
