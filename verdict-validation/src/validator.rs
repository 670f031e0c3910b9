//! Validation session
//!
//! A [`Validator`] runs rule chains over named fields, turns failures into
//! messages and keeps both the messages and the validated values. Failed
//! fields never abort a pass: callers inspect [`Validator::is_valid`] and the
//! error store once every field has been checked.
//!
//! # Message resolution
//!
//! For a failed field the message of each failed rule is taken from, in
//! increasing priority:
//!
//! 1. the rule's own default message
//! 2. the validator's default messages
//! 3. the messages passed to the validate call
//! 4. the messages carried by the field's [`RuleSpec`]
//!
//! A higher source only replaces the rules it names. A spec with a single
//! `message` skips all of this and records exactly that message.

use crate::errors::value_kind;
use crate::input::{object_property, RequestParams};
use crate::{
    ErrorEntry, ErrorStore, FieldKey, FieldRules, Input, Messages, ParamSource, RuleFailure,
    RuleSpec, ValidationError, ValidatorConfig, ValueStore,
};
use serde::Serialize;
use serde_json::{Map, Value};
use verdict_core::HttpRequest;
use verdict_log::{debug, warn};

const LOG_TARGET: &str = "verdict::validator";

/// Validates fields and accumulates their errors and values.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    show_validation_rules: bool,
    default_messages: Messages,
    errors: ErrorStore,
    values: ValueStore,
}

impl Validator {
    /// Create a validator.
    ///
    /// With `show_validation_rules` set, each stored error keeps the name of
    /// the rule it came from.
    pub fn new(show_validation_rules: bool, default_messages: Messages) -> Self {
        Self {
            show_validation_rules,
            default_messages,
            ..Self::default()
        }
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self::new(config.show_validation_rules, config.default_messages)
    }

    /// The current options
    pub fn config(&self) -> ValidatorConfig {
        ValidatorConfig {
            show_validation_rules: self.show_validation_rules,
            default_messages: self.default_messages.clone(),
        }
    }

    pub fn show_validation_rules(&self) -> bool {
        self.show_validation_rules
    }

    pub fn set_show_validation_rules(&mut self, show: bool) -> &mut Self {
        self.show_validation_rules = show;
        self
    }

    pub fn default_messages(&self) -> &Messages {
        &self.default_messages
    }

    pub fn set_default_messages(&mut self, messages: Messages) -> &mut Self {
        self.default_messages = messages;
        self
    }

    pub fn set_default_message(
        &mut self,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        self.default_messages.insert(rule.into(), message.into());
        self
    }

    // Bulk validation

    /// Validate every field of `rules` against `input`.
    ///
    /// Objects are read by property and arrays by index. Any other
    /// [`Input::Object`] value is rejected.
    pub fn validate(
        &mut self,
        input: Input<'_>,
        rules: &FieldRules,
        group: Option<&str>,
        messages: Option<&Messages>,
    ) -> Result<&mut Self, ValidationError> {
        match input {
            Input::Mapping(map) => self.validate_mapping(map, rules, group, messages),
            Input::Request(request) => self.validate_request(request, rules, group, messages),
            Input::Object(Value::Object(map)) => self.validate_mapping(&map, rules, group, messages),
            Input::Object(Value::Array(items)) => {
                self.validate_params(items.as_slice(), rules, group, messages)
            }
            Input::Object(other) => {
                let err = ValidationError::UnsupportedInput(value_kind(&other).to_string());
                warn!(target: LOG_TARGET, "{}", err);
                Err(err)
            }
        }
    }

    /// Validate the entries of a mapping; missing entries validate as null.
    pub fn validate_mapping(
        &mut self,
        input: &Map<String, Value>,
        rules: &FieldRules,
        group: Option<&str>,
        messages: Option<&Messages>,
    ) -> Result<&mut Self, ValidationError> {
        self.validate_params(input, rules, group, messages)
    }

    /// Validate the properties of anything that serializes to a JSON object.
    pub fn validate_object<T: Serialize + ?Sized>(
        &mut self,
        object: &T,
        rules: &FieldRules,
        group: Option<&str>,
        messages: Option<&Messages>,
    ) -> Result<&mut Self, ValidationError> {
        let object = serde_json::to_value(object)?;
        if !object.is_object() {
            let err = ValidationError::NotAnObject(value_kind(&object).to_string());
            warn!(target: LOG_TARGET, "{}", err);
            return Err(err);
        }
        for (key, spec) in rules {
            let value = object_property(&object, key, Value::Null)?;
            self.validate_field(value, spec, key, group, messages)?;
        }
        Ok(self)
    }

    /// Validate the body and query parameters of a request.
    pub fn validate_request(
        &mut self,
        request: &HttpRequest,
        rules: &FieldRules,
        group: Option<&str>,
        messages: Option<&Messages>,
    ) -> Result<&mut Self, ValidationError> {
        let params = RequestParams::new(request);
        self.validate_params(&params, rules, group, messages)
    }

    /// Validate fields read from any [`ParamSource`].
    pub fn validate_params<S: ParamSource + ?Sized>(
        &mut self,
        source: &S,
        rules: &FieldRules,
        group: Option<&str>,
        messages: Option<&Messages>,
    ) -> Result<&mut Self, ValidationError> {
        for (key, spec) in rules {
            let value = source.value_or(key, Value::Null);
            self.validate_field(value, spec, key, group, messages)?;
        }
        Ok(self)
    }

    // Single field

    /// Validate one value and record the outcome under `key`.
    ///
    /// The value is stored whether or not it passes. A failure replaces the
    /// errors previously stored for the field; a pass leaves them alone.
    pub fn validate_field(
        &mut self,
        value: Value,
        spec: &RuleSpec,
        key: &str,
        group: Option<&str>,
        messages: Option<&Messages>,
    ) -> Result<&mut Self, ValidationError> {
        let field = FieldKey::scoped(key, group);
        let chain = spec.chain().ok_or_else(|| {
            warn!(target: LOG_TARGET, "no rule chain for field `{}`", field);
            ValidationError::MissingRules(field.to_string())
        })?;

        let outcome = chain.assert(&value);
        self.values.set(field.clone(), value);

        let mut failure = match outcome {
            Ok(()) => {
                debug!(target: LOG_TARGET, "field `{}` passed", field);
                return Ok(self);
            }
            Err(failure) => failure,
        };
        failure.name_unnamed(key);

        if let Some(message) = spec.message().filter(|m| !m.is_empty()) {
            debug!(target: LOG_TARGET, "field `{}` failed, using its custom message", field);
            self.errors.set(field, vec![ErrorEntry::message(message)]);
            return Ok(self);
        }

        let resolved = self.resolve(&failure, &chain.names(), spec, messages);
        debug!(
            target: LOG_TARGET,
            "field `{}` failed with {} message(s)",
            field,
            resolved.len()
        );
        if resolved.is_empty() {
            return Ok(self);
        }

        let entries = resolved
            .into_iter()
            .map(|(rule, message)| {
                if self.show_validation_rules {
                    ErrorEntry::keyed(rule, message)
                } else {
                    ErrorEntry::message(message)
                }
            })
            .collect();
        self.errors.set(field, entries);
        Ok(self)
    }

    /// Final message per failed rule, in chain order.
    fn resolve(
        &self,
        failure: &RuleFailure,
        names: &[&str],
        spec: &RuleSpec,
        messages: Option<&Messages>,
    ) -> Messages {
        let mut resolved = failure.find_messages(names);
        overlay(&mut resolved, failure, &self.default_messages);
        if let Some(messages) = messages {
            overlay(&mut resolved, failure, messages);
        }
        if let Some(messages) = spec.messages() {
            overlay(&mut resolved, failure, messages);
        }
        resolved.retain(|_, message| !message.is_empty());
        resolved
    }

    // Errors

    pub fn errors(&self) -> &ErrorStore {
        &self.errors
    }

    /// Replace the whole error store
    pub fn replace_errors(
        &mut self,
        errors: impl IntoIterator<Item = (FieldKey, Vec<ErrorEntry>)>,
    ) -> &mut Self {
        self.errors.replace_all(errors);
        self
    }

    /// Replace the errors of one field
    pub fn set_errors<I, E>(&mut self, key: impl Into<FieldKey>, errors: I) -> &mut Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ErrorEntry>,
    {
        self.errors
            .set(key.into(), errors.into_iter().map(Into::into).collect());
        self
    }

    /// Append one message to a field's errors
    pub fn add_error(&mut self, key: impl Into<FieldKey>, message: impl Into<String>) -> &mut Self {
        self.errors.push(key.into(), ErrorEntry::message(message));
        self
    }

    /// Errors of one field; empty when it has none
    pub fn get_errors(&self, key: impl Into<FieldKey>) -> &[ErrorEntry] {
        self.errors.get(&key.into())
    }

    pub fn error_messages(&self, key: impl Into<FieldKey>) -> Vec<&str> {
        self.errors.messages(&key.into())
    }

    /// Errors of every field in `group`
    pub fn group_errors(&self, group: &str) -> Vec<(&str, &[ErrorEntry])> {
        self.errors.group(group)
    }

    /// First message of a field, or `""`
    pub fn first_error(&self, key: impl Into<FieldKey>) -> &str {
        self.errors.first(&key.into())
    }

    /// Message at `index` for a field, or `""`.
    ///
    /// A grouped key only reads its own group's slot.
    pub fn error(&self, key: impl Into<FieldKey>, index: usize) -> &str {
        self.errors.nth(&key.into(), index)
    }

    pub fn remove_errors(&mut self, key: impl Into<FieldKey>) -> &mut Self {
        self.errors.clear_slot(&key.into());
        self
    }

    pub fn remove_group_errors(&mut self, group: &str) -> &mut Self {
        self.errors.clear_group(group);
        self
    }

    pub fn remove_all_errors(&mut self) -> &mut Self {
        self.errors.clear_all();
        self
    }

    /// True when no field holds an error message
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of top-level error entries; a group counts once.
    pub fn count(&self) -> usize {
        self.errors.count()
    }

    // Values

    /// Last value validated or set for a field
    pub fn value(&self, key: impl Into<FieldKey>) -> Option<&Value> {
        self.values.get(&key.into())
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn set_value(&mut self, key: impl Into<FieldKey>, value: impl Into<Value>) -> &mut Self {
        self.values.set(key.into(), value.into());
        self
    }

    /// Replace every stored value
    pub fn set_values(&mut self, values: impl IntoIterator<Item = (FieldKey, Value)>) -> &mut Self {
        self.values.replace_all(values);
        self
    }

    pub fn group_values(&self, group: &str) -> Vec<(&str, &Value)> {
        self.values.group(group)
    }
}

/// Layer the non-empty `templates` that match failed rules over `resolved`.
fn overlay(resolved: &mut Messages, failure: &RuleFailure, templates: &Messages) {
    if templates.is_empty() {
        return;
    }
    let templates: Messages = templates
        .iter()
        .filter(|(_, template)| !template.is_empty())
        .map(|(rule, template)| (rule.clone(), template.clone()))
        .collect();
    resolved.extend(failure.find_templated(&templates));
}
