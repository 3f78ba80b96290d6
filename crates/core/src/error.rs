//! Configuration error model.

use thiserror::Error;

/// Result type used by every converter and configuration parser.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failure to read, interpret or dispatch a persisted job configuration.
///
/// All variants are fatal for the job attempt that hit them. Retrying is the
/// job executor's business, not the converter's.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required wire field is absent.
    #[error("malformed configuration: missing required field `{0}`")]
    MissingField(String),

    /// A wire field is present but has the wrong JSON type.
    #[error("malformed configuration: field `{field}` is not {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    /// A wire field is well-typed but outside its value domain.
    #[error("malformed configuration: field `{field}` has invalid value `{value}`")]
    InvalidValue { field: String, value: String },

    /// The canonical string could not be read as a JSON object.
    #[error("malformed configuration: {0}")]
    Syntax(String),

    /// A `by` selector the dispatch logic does not know.
    #[error("unexpected job handler configuration for property `by`: {0}")]
    UnknownSelector(String),

    /// A modification instruction object without any discriminator key.
    #[error("unrecognized modification instruction with keys [{0}]")]
    UnrecognizedInstruction(String),
}

impl ConfigError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn invalid_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidType {
            field: field.into(),
            expected,
        }
    }

    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn syntax(msg: impl Into<String>) -> Self {
        Self::Syntax(msg.into())
    }

    /// True for the MalformedConfiguration family (wire shape problems).
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingField(_)
                | ConfigError::InvalidType { .. }
                | ConfigError::InvalidValue { .. }
                | ConfigError::Syntax(_)
        )
    }
}
