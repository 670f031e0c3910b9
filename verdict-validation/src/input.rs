// Input sources for bulk validation

use crate::errors::value_kind;
use crate::{ParamSource, ValidationError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use verdict_core::HttpRequest;
use verdict_log::warn;

/// The kinds of input a [`Validator`](crate::Validator) can read fields from.
#[derive(Debug, Clone)]
pub enum Input<'a> {
    /// Field name to value
    Mapping(&'a Map<String, Value>),
    /// An object whose properties are the fields; anything else is rejected
    Object(Value),
    /// Body and query parameters of a request
    Request(&'a HttpRequest),
}

impl ParamSource for Map<String, Value> {
    fn value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl ParamSource for HashMap<String, Value> {
    fn value(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Array entries addressed by their index
impl ParamSource for [Value] {
    fn value(&self, name: &str) -> Option<Value> {
        name.parse::<usize>()
            .ok()
            .and_then(|index| self.get(index))
            .cloned()
    }
}

/// Read a property of an object, or `default` when it has none by that name.
pub fn object_property(object: &Value, name: &str, default: Value) -> Result<Value, ValidationError> {
    match object {
        Value::Object(map) => Ok(map.value_or(name, default)),
        other => Err(ValidationError::NotAnObject(value_kind(other).to_string())),
    }
}

/// Parameters of a request: the decoded body first, then the query string.
#[derive(Debug, Clone)]
pub struct RequestParams<'a> {
    body: Option<Value>,
    query: &'a HashMap<String, String>,
}

impl<'a> RequestParams<'a> {
    /// Decode the request body once for repeated lookups.
    ///
    /// A body that does not decode is treated as absent so that query
    /// parameters still resolve.
    pub fn new(request: &'a HttpRequest) -> Self {
        let body = request.parsed_body().unwrap_or_else(|err| {
            warn!(target: "verdict::input", "ignoring undecodable request body: {}", err);
            None
        });

        Self {
            body,
            query: &request.query_params,
        }
    }
}

impl ParamSource for RequestParams<'_> {
    fn value(&self, name: &str) -> Option<Value> {
        let from_body = match &self.body {
            Some(Value::Object(map)) => map.value(name),
            Some(Value::Array(items)) => items.as_slice().value(name),
            _ => None,
        };

        from_body.or_else(|| self.query.get(name).cloned().map(Value::String))
    }
}

impl ParamSource for HttpRequest {
    fn value(&self, name: &str) -> Option<Value> {
        RequestParams::new(self).value(name)
    }
}

/// Read one request parameter, or `default` when neither body nor query has it.
pub fn request_param(request: &HttpRequest, name: &str, default: Value) -> Value {
    request.value_or(name, default)
}
