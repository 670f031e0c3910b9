// Validator configuration

use crate::{Messages, ValidationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Prefix of the environment variables read by [`ValidatorConfig::from_env`]
pub const ENV_PREFIX: &str = "VERDICT";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(FileFormat::Json),
            "toml" => Some(FileFormat::Toml),
            _ => None,
        }
    }
}

/// Options recognized by a [`Validator`](crate::Validator).
///
/// ```toml
/// show_validation_rules = true
///
/// [default_messages]
/// notEmpty = "This field is required"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Keep the rule name next to each stored error message
    #[serde(alias = "showValidationRules")]
    pub show_validation_rules: bool,

    /// Fallback messages keyed by rule name
    #[serde(alias = "defaultMessages")]
    pub default_messages: Messages,
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_show_validation_rules(mut self, show: bool) -> Self {
        self.show_validation_rules = show;
        self
    }

    pub fn with_default_message(mut self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        self.default_messages.insert(rule.into(), message.into());
        self
    }

    /// Parse configuration text in the given format
    pub fn parse(content: &str, format: FileFormat) -> Result<Self, ValidationError> {
        match format {
            FileFormat::Json => serde_json::from_str(content)
                .map_err(|e| ValidationError::Config(format!("JSON parse error: {}", e))),
            FileFormat::Toml => toml::from_str(content)
                .map_err(|e| ValidationError::Config(format!("TOML parse error: {}", e))),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ValidationError> {
        Self::parse(content, FileFormat::Json)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ValidationError> {
        Self::parse(content, FileFormat::Toml)
    }

    /// Load a file, picking the format from its extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ValidationError::Config("No file extension found".to_string()))?;
        let format = FileFormat::from_extension(ext)
            .ok_or_else(|| ValidationError::Config(format!("Unsupported format: {}", ext)))?;

        let content = fs::read_to_string(path)?;
        Self::parse(&content, format)
    }

    /// Read `VERDICT_SHOW_VALIDATION_RULES` and `VERDICT_DEFAULT_MESSAGE_<RULE>`
    /// from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(ENV_PREFIX, std::env::vars())
    }

    /// Build a config from variables named `<prefix>_SHOW_VALIDATION_RULES`
    /// and `<prefix>_DEFAULT_MESSAGE_<RULE>`, where `<RULE>` is the rule name
    /// in screaming snake case (`NOT_EMPTY` for `notEmpty`).
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let show_key = format!("{}_SHOW_VALIDATION_RULES", prefix);
        let message_prefix = format!("{}_DEFAULT_MESSAGE_", prefix);
        let mut config = Self::default();

        for (key, value) in vars {
            let (key, value) = (key.as_ref(), value.as_ref());
            if key == show_key {
                config.show_validation_rules =
                    value == "1" || value.eq_ignore_ascii_case("true");
            } else if let Some(rule) = key.strip_prefix(&message_prefix) {
                if !rule.is_empty() {
                    config
                        .default_messages
                        .insert(rule_name_from_env(rule), value.to_string());
                }
            }
        }

        config
    }
}

/// `NOT_EMPTY` -> `notEmpty`
fn rule_name_from_env(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    for (i, part) in raw.split('_').filter(|p| !p.is_empty()).enumerate() {
        let lower = part.to_lowercase();
        if i == 0 {
            name.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                name.extend(first.to_uppercase());
                name.push_str(chars.as_str());
            }
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_camel_case_keys() {
        let config = ValidatorConfig::from_json_str(
            r#"{"showValidationRules": true, "defaultMessages": {"notEmpty": "Required"}}"#,
        )
        .unwrap();

        assert!(config.show_validation_rules);
        assert_eq!(config.default_messages["notEmpty"], "Required");
    }

    #[test]
    fn test_toml() {
        let config = ValidatorConfig::from_toml_str(
            "show_validation_rules = false\n\n[default_messages]\nemail = \"Bad email\"\n",
        )
        .unwrap();

        assert!(!config.show_validation_rules);
        assert_eq!(config.default_messages["email"], "Bad email");
    }

    #[test]
    fn test_missing_fields_default() {
        let config = ValidatorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ValidatorConfig::default());
    }

    #[test]
    fn test_parse_error() {
        let err = ValidatorConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, ValidationError::Config(_)));
    }

    #[test]
    fn test_file_format_detection() {
        assert_eq!(FileFormat::from_extension("JSON"), Some(FileFormat::Json));
        assert_eq!(FileFormat::from_extension("toml"), Some(FileFormat::Toml));
        assert_eq!(FileFormat::from_extension("yaml"), None);

        let err = ValidatorConfig::from_file("validator.yaml").unwrap_err();
        assert!(matches!(err, ValidationError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("verdict-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"show_validation_rules": true}"#).unwrap();

        let config = ValidatorConfig::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(config.show_validation_rules);
    }

    #[test]
    fn test_from_vars() {
        let config = ValidatorConfig::from_vars(
            "APP",
            [
                ("APP_SHOW_VALIDATION_RULES", "true"),
                ("APP_DEFAULT_MESSAGE_NOT_EMPTY", "Required"),
                ("APP_DEFAULT_MESSAGE_EMAIL", "Bad email"),
                ("OTHER_DEFAULT_MESSAGE_MIN", "ignored"),
            ],
        );

        assert!(config.show_validation_rules);
        assert_eq!(config.default_messages.len(), 2);
        assert_eq!(config.default_messages["notEmpty"], "Required");
        assert_eq!(config.default_messages["email"], "Bad email");
    }

    #[test]
    fn test_rule_name_from_env() {
        assert_eq!(rule_name_from_env("NOT_EMPTY"), "notEmpty");
        assert_eq!(rule_name_from_env("STRING_TYPE"), "stringType");
        assert_eq!(rule_name_from_env("EMAIL"), "email");
    }
}
