// Per-field rule specs

use crate::{RuleChain, ValidationError};
use indexmap::IndexMap;
use serde_json::Value;

/// Override messages keyed by normalized rule name.
pub type Messages = IndexMap<String, String>;

/// Rule specs keyed by field name, validated in insertion order.
pub type FieldRules = IndexMap<String, RuleSpec>;

/// How one field is validated.
#[derive(Debug, Clone)]
pub enum RuleSpec {
    /// A bare chain; messages come from the defaults and call overrides.
    Direct(RuleChain),
    /// A chain with field-specific message overrides.
    WithOverrides(Overrides),
}

/// The structured form of a [`RuleSpec`].
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// The chain to run. A structured spec without one is rejected when used.
    pub rules: Option<RuleChain>,
    /// Replaces every resolved message for the field when set
    pub message: Option<String>,
    /// Per-rule overrides, the highest-priority message source
    pub messages: Messages,
}

impl RuleSpec {
    /// The rule chain, if this spec has one
    pub fn chain(&self) -> Option<&RuleChain> {
        match self {
            RuleSpec::Direct(chain) => Some(chain),
            RuleSpec::WithOverrides(overrides) => overrides.rules.as_ref(),
        }
    }

    /// The single message replacing all resolved messages
    pub fn message(&self) -> Option<&str> {
        match self {
            RuleSpec::Direct(_) => None,
            RuleSpec::WithOverrides(overrides) => overrides.message.as_deref(),
        }
    }

    /// The per-rule overrides, when any are set
    pub fn messages(&self) -> Option<&Messages> {
        match self {
            RuleSpec::WithOverrides(overrides) if !overrides.messages.is_empty() => {
                Some(&overrides.messages)
            }
            _ => None,
        }
    }

    fn into_overrides(self) -> Overrides {
        match self {
            RuleSpec::Direct(chain) => Overrides {
                rules: Some(chain),
                ..Overrides::default()
            },
            RuleSpec::WithOverrides(overrides) => overrides,
        }
    }

    /// Replace every message for this field with `message` on failure.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        let mut overrides = self.into_overrides();
        overrides.message = Some(message.into());
        RuleSpec::WithOverrides(overrides)
    }

    /// Override the message of one rule.
    pub fn with_rule_message(self, rule: impl Into<String>, message: impl Into<String>) -> Self {
        let mut overrides = self.into_overrides();
        overrides.messages.insert(rule.into(), message.into());
        RuleSpec::WithOverrides(overrides)
    }

    /// Override the messages of several rules.
    pub fn with_messages<I, K, V>(self, messages: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut overrides = self.into_overrides();
        overrides
            .messages
            .extend(messages.into_iter().map(|(k, v)| (k.into(), v.into())));
        RuleSpec::WithOverrides(overrides)
    }

    /// Build a structured spec from loose JSON options.
    ///
    /// Recognized options are `message` (a string) and `messages` (an object
    /// of strings). Any other type for either is rejected.
    pub fn from_options(
        field: &str,
        rules: Option<RuleChain>,
        options: &Value,
    ) -> Result<Self, ValidationError> {
        let mut overrides = Overrides {
            rules,
            ..Overrides::default()
        };

        match options.get("message") {
            None | Some(Value::Null) => {}
            Some(Value::String(message)) => overrides.message = Some(message.clone()),
            Some(_) => return Err(ValidationError::InvalidMessage(field.to_string())),
        }

        match options.get("messages") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (rule, message) in map {
                    let message = message.as_str().ok_or_else(|| {
                        ValidationError::InvalidMessage(format!("{}.{}", field, rule))
                    })?;
                    overrides.messages.insert(rule.clone(), message.to_string());
                }
            }
            Some(_) => return Err(ValidationError::InvalidMessage(field.to_string())),
        }

        Ok(RuleSpec::WithOverrides(overrides))
    }
}

impl From<RuleChain> for RuleSpec {
    fn from(chain: RuleChain) -> Self {
        RuleSpec::Direct(chain)
    }
}

impl From<Overrides> for RuleSpec {
    fn from(overrides: Overrides) -> Self {
        RuleSpec::WithOverrides(overrides)
    }
}
