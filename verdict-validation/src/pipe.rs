// Validation pipe for request handlers

use crate::{FieldRules, Messages, ValidationError, Validator};
use serde_json::json;
use verdict_core::{Error, HttpRequest, HttpResponse, JSON_CONTENT_TYPE};

/// Turns a validator's outcome into framework errors and responses
pub struct ValidationPipe;

impl ValidationPipe {
    /// `Ok` when the validator holds no errors, otherwise a validation error
    /// carrying the error store as JSON.
    pub fn check(validator: &Validator) -> Result<(), Error> {
        if validator.is_valid() {
            Ok(())
        } else {
            Err(Error::Validation(validator.errors().to_json().to_string()))
        }
    }

    /// Validate a request and check the result in one step.
    ///
    /// A misconfigured rule set is reported as an internal error.
    pub fn validate_request(
        validator: &mut Validator,
        request: &HttpRequest,
        rules: &FieldRules,
        messages: Option<&Messages>,
    ) -> Result<(), Error> {
        validator
            .validate_request(request, rules, None, messages)
            .map_err(|e: ValidationError| Error::Internal(e.to_string()))?;
        Self::check(validator)
    }

    /// Transform validation errors to HTTP response
    pub fn error_response(validator: &Validator) -> HttpResponse {
        let body = json!({ "errors": validator.errors().to_json() });
        HttpResponse::bad_request()
            .with_header("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())
            .with_body(body.to_string().into_bytes())
    }
}

/// Macro to return early from a handler when a validator holds errors
#[macro_export]
macro_rules! validate {
    ($validator:expr) => {{
        $crate::ValidationPipe::check(&$validator)?
    }};
}
