//! Field validation for Verdict
//!
//! A [`Validator`] checks named fields against [`RuleChain`]s, resolves the
//! message of every failed rule and keeps the errors and values it saw,
//! optionally grouped.
//!
//! # Examples
//!
//! ## Validating a mapping
//!
//! ```
//! use serde_json::json;
//! use verdict_validation::{FieldRules, Input, RuleChain, RuleSpec, Validator};
//!
//! let mut rules = FieldRules::new();
//! rules.insert("name".to_string(), RuleChain::new().not_empty().string_type().into());
//! rules.insert(
//!     "email".to_string(),
//!     RuleSpec::from(RuleChain::new().email()).with_rule_message("email", "Please enter a valid email"),
//! );
//!
//! let input = json!({"name": "Alice", "email": "alice@"});
//! let mut validator = Validator::default();
//! validator.validate(Input::Object(input), &rules, None, None).unwrap();
//!
//! assert!(!validator.is_valid());
//! assert_eq!(validator.first_error("email"), "Please enter a valid email");
//! assert_eq!(validator.first_error("name"), "");
//! ```
//!
//! ## Default messages and rule names
//!
//! ```
//! use serde_json::Value;
//! use verdict_validation::{ErrorEntry, RuleChain, RuleSpec, Validator, ValidatorConfig};
//!
//! let config = ValidatorConfig::new()
//!     .with_show_validation_rules(true)
//!     .with_default_message("notEmpty", "{{name}} is required");
//! let mut validator = Validator::with_config(config);
//!
//! let spec = RuleSpec::from(RuleChain::new().not_empty());
//! validator.validate_field(Value::Null, &spec, "city", Some("address"), None).unwrap();
//!
//! assert_eq!(
//!     validator.get_errors(("address", "city")),
//!     [ErrorEntry::keyed("notEmpty", "city is required")]
//! );
//! assert!(validator.get_errors("city").is_empty());
//! ```

mod config;
mod errors;
mod failure;
mod input;
mod pipe;
mod rule_spec;
mod rules;
mod store;
mod traits;
mod validator;
mod validators;

pub use config::*;
pub use errors::*;
pub use failure::*;
pub use input::*;
pub use pipe::*;
pub use rule_spec::*;
pub use rules::*;
pub use store::*;
pub use traits::*;
pub use validator::*;
pub use validators::*;

/// Result type for validator operations
pub type Result<T> = std::result::Result<T, ValidationError>;
