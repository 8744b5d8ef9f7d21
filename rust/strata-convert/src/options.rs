//! Converter configuration.

use serde::Deserialize;
use strata_common::{Result, error::Error};

/// Property key enabling [`ConverterOptions::numbers_default_to_zero`].
pub const NUMBERS_DEFAULT_TO_ZERO_KEY: &str = "strata.numbers.default.to.zero";

/// Options controlling how records are assembled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConverterOptions {
    /// When set, optional `int32`, `int64`, `float` and `double` fields with
    /// no value in a record are filled with zero instead of being left absent.
    /// Optional boolean and binary fields are never filled.
    pub numbers_default_to_zero: bool,
}

impl ConverterOptions {
    pub fn new() -> ConverterOptions {
        Default::default()
    }

    pub fn with_numbers_default_to_zero(self, numbers_default_to_zero: bool) -> Self {
        Self {
            numbers_default_to_zero,
            ..self
        }
    }

    /// Reads options from string properties. Unknown keys are ignored.
    pub fn from_properties<'a>(
        properties: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<ConverterOptions> {
        let mut options = ConverterOptions::default();
        for (name, value) in properties {
            if name == NUMBERS_DEFAULT_TO_ZERO_KEY {
                options.numbers_default_to_zero = parse_bool(name, value)?;
            }
        }
        Ok(options)
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(Error::invalid_arg(
            name,
            format!("expected 'true' or 'false', got '{value}'"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        assert!(!ConverterOptions::new().numbers_default_to_zero);
        assert!(
            ConverterOptions::new()
                .with_numbers_default_to_zero(true)
                .numbers_default_to_zero
        );
    }

    #[test]
    fn test_from_properties() {
        let options = ConverterOptions::from_properties([
            ("unrelated.key", "whatever"),
            (NUMBERS_DEFAULT_TO_ZERO_KEY, " TRUE "),
        ])
        .unwrap();
        assert!(options.numbers_default_to_zero);

        let options = ConverterOptions::from_properties(std::iter::empty()).unwrap();
        assert!(!options.numbers_default_to_zero);

        assert!(ConverterOptions::from_properties([(NUMBERS_DEFAULT_TO_ZERO_KEY, "yes")]).is_err());
    }

    #[test]
    fn test_deserialize() {
        let options: ConverterOptions =
            serde_json::from_str(r#"{"numbers_default_to_zero": true}"#).unwrap();
        assert!(options.numbers_default_to_zero);

        let options: ConverterOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ConverterOptions::default());
    }
}
