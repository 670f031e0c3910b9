//! URL-encoded form bodies

use crate::Error;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Content type of URL-encoded form submissions
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Parse URL-encoded form data into a typed value
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_urlencoded::from_bytes(body)
        .map_err(|e| Error::BadRequest(format!("Failed to parse form data: {}", e)))
}

/// Parse URL-encoded form data into a JSON object of strings.
///
/// A name repeated in the body keeps its last value.
pub fn parse_form_map(body: &[u8]) -> Result<Map<String, Value>, Error> {
    let pairs: Vec<(String, String)> = parse_form(body)?;

    Ok(pairs
        .into_iter()
        .map(|(name, value)| (name, Value::String(value)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn test_parse_form_map() {
        let body = b"name=John+Doe&email=john%40example.com&age=30";
        let form = parse_form_map(body).unwrap();

        assert_eq!(form.get("name"), Some(&Value::from("John Doe")));
        assert_eq!(form.get("email"), Some(&Value::from("john@example.com")));
        assert_eq!(form.get("age"), Some(&Value::from("30")));
    }

    #[test]
    fn test_repeated_field_keeps_last() {
        let form = parse_form_map(b"tag=a&tag=b").unwrap();
        assert_eq!(form.len(), 1);
        assert_eq!(form.get("tag"), Some(&Value::from("b")));
    }

    #[test]
    fn test_parse_typed_form() {
        #[derive(Deserialize)]
        struct Login {
            username: String,
        }

        let login: Login = parse_form(b"username=alice").unwrap();
        assert_eq!(login.username, "alice");
    }

    #[test]
    fn test_empty_body() {
        assert!(parse_form_map(b"").unwrap().is_empty());
    }
}
