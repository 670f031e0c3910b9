// Configuration errors raised by a validation session

use thiserror::Error;

/// Errors returned by the validator.
///
/// A field that fails its rules is not an error; its messages are recorded in
/// the session's error store. These variants describe misuse of the API or an
/// unreadable configuration and abort the call that raised them.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A structured rule spec was given without a rule chain
    #[error("Rule spec for field `{0}` does not contain a rule chain")]
    MissingRules(String),

    /// An object was required but the input is something else
    #[error("Expected an object, got {0}")]
    NotAnObject(String),

    /// The input is neither a mapping nor an object
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// A custom override message is not a string
    #[error("Custom message for `{0}` must be a string")]
    InvalidMessage(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ValidationError {
    /// Whether this error reports a programming mistake in how the validator
    /// was called, as opposed to a configuration loading problem.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ValidationError::MissingRules(_)
                | ValidationError::NotAnObject(_)
                | ValidationError::UnsupportedInput(_)
                | ValidationError::InvalidMessage(_)
        )
    }
}

/// Short description of a JSON value's kind for error messages.
pub(crate) fn value_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
