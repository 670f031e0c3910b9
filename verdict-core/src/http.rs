// HTTP request and response types

use crate::form::{FORM_CONTENT_TYPE, parse_form_map};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Content type of JSON bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP request wrapper
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub query_params: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Set a JSON body and the matching content type
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, crate::Error> {
        let body =
            serde_json::to_vec(value).map_err(|e| crate::Error::Serialization(e.to_string()))?;
        Ok(self
            .with_header("Content-Type", JSON_CONTENT_TYPE)
            .with_body(body))
    }

    /// Set a URL-encoded form body and the matching content type
    pub fn with_form<T: Serialize>(self, value: &T) -> Result<Self, crate::Error> {
        let body = serde_urlencoded::to_string(value)
            .map_err(|e| crate::Error::Serialization(e.to_string()))?;
        Ok(self
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_body(body))
    }

    /// Parse the request body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Result<T, crate::Error> {
        serde_json::from_slice(&self.body).map_err(|e| crate::Error::Deserialization(e.to_string()))
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Get a header by name, ignoring ASCII case
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Media type of the body without parameters such as `charset`
    pub fn content_type(&self) -> Option<String> {
        self.header("Content-Type").map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Decode the body according to its content type.
    ///
    /// JSON bodies decode to any JSON value, form bodies to an object of
    /// strings. An empty body or an unrecognized content type yields `None`.
    pub fn parsed_body(&self) -> Result<Option<Value>, crate::Error> {
        if self.body.is_empty() {
            return Ok(None);
        }

        match self.content_type().as_deref() {
            Some(ct) if ct == JSON_CONTENT_TYPE || ct.ends_with("+json") => self.json().map(Some),
            Some(FORM_CONTENT_TYPE) => parse_form_map(&self.body).map(|map| Some(Value::Object(map))),
            _ => Ok(None),
        }
    }
}

/// HTTP response wrapper
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn bad_request() -> Self {
        Self::new(400)
    }

    pub fn unprocessable_entity() -> Self {
        Self::new(422)
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_json<T: Serialize>(mut self, value: &T) -> Result<Self, crate::Error> {
        self.body =
            serde_json::to_vec(value).map_err(|e| crate::Error::Serialization(e.to_string()))?;
        self.headers
            .insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Body decoded as UTF-8, if valid
    pub fn body_string(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_content_type_strips_parameters() {
        let req = HttpRequest::new("POST", "/users")
            .with_header("content-type", "Application/JSON; charset=utf-8");
        assert_eq!(req.content_type().as_deref(), Some("application/json"));
    }

    #[test]
    fn test_parsed_json_body() {
        let req = HttpRequest::new("POST", "/users")
            .with_json(&json!({"name": "alice"}))
            .unwrap();
        assert_eq!(req.parsed_body().unwrap(), Some(json!({"name": "alice"})));
    }

    #[test]
    fn test_parsed_form_body() {
        let req = HttpRequest::new("POST", "/users")
            .with_header("Content-Type", FORM_CONTENT_TYPE)
            .with_body("name=bob&age=4");
        assert_eq!(
            req.parsed_body().unwrap(),
            Some(json!({"name": "bob", "age": "4"}))
        );
    }

    #[test]
    fn test_unparsed_bodies() {
        let empty = HttpRequest::new("GET", "/");
        assert_eq!(empty.parsed_body().unwrap(), None);

        let text = HttpRequest::new("POST", "/")
            .with_header("Content-Type", "text/plain")
            .with_body("hello");
        assert_eq!(text.parsed_body().unwrap(), None);
    }

    #[test]
    fn test_malformed_json_body() {
        let req = HttpRequest::new("POST", "/")
            .with_header("Content-Type", JSON_CONTENT_TYPE)
            .with_body("{not json");
        assert!(matches!(
            req.parsed_body(),
            Err(crate::Error::Deserialization(_))
        ));
    }

    #[test]
    fn test_response_json() {
        let res = HttpResponse::bad_request()
            .with_json(&json!({"ok": false}))
            .unwrap();
        assert_eq!(res.status, 400);
        assert_eq!(
            res.headers.get("Content-Type"),
            Some(&JSON_CONTENT_TYPE.to_string())
        );
        assert_eq!(res.body_string().as_deref(), Some(r#"{"ok":false}"#));
    }
}
