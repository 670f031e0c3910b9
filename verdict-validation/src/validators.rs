// Built-in rules

use crate::{Rule, RuleChain, RuleFailure, failure::display_input};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALNUM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Numeric view of an input: numbers, and strings that parse as numbers.
fn as_number(input: &Value) -> Option<f64> {
    match input {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Bounds print without a trailing `.0` when they are whole.
fn format_bound(bound: f64) -> String {
    if bound.fract() == 0.0 && bound.abs() < 1e15 {
        format!("{}", bound as i64)
    } else {
        bound.to_string()
    }
}

fn matches_text(regex: &Regex, input: &Value) -> bool {
    match input {
        Value::String(s) => regex.is_match(s),
        _ => false,
    }
}

// Presence

/// Fails on null, blank strings, `false` and empty arrays or objects
#[derive(Debug, Clone, Copy)]
pub struct NotEmpty;

impl Rule for NotEmpty {
    fn name(&self) -> &'static str {
        "notEmpty"
    }

    fn is_valid(&self, input: &Value) -> bool {
        match input {
            Value::Null | Value::Bool(false) => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }

    fn template(&self) -> String {
        "{{name}} must not be empty".to_string()
    }
}

/// Fails on null and the empty string only
#[derive(Debug, Clone, Copy)]
pub struct NotOptional;

impl Rule for NotOptional {
    fn name(&self) -> &'static str {
        "notOptional"
    }

    fn is_valid(&self, input: &Value) -> bool {
        !is_optional_empty(input)
    }

    fn template(&self) -> String {
        "{{name}} must not be optional".to_string()
    }
}

fn is_optional_empty(input: &Value) -> bool {
    matches!(input, Value::Null) || matches!(input, Value::String(s) if s.is_empty())
}

// Types

#[derive(Debug, Clone, Copy)]
pub struct StringType;

impl Rule for StringType {
    fn name(&self) -> &'static str {
        "stringType"
    }

    fn is_valid(&self, input: &Value) -> bool {
        input.is_string()
    }

    fn template(&self) -> String {
        "{{name}} must be of type string".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntType;

impl Rule for IntType {
    fn name(&self) -> &'static str {
        "intType"
    }

    fn is_valid(&self, input: &Value) -> bool {
        input.is_i64() || input.is_u64()
    }

    fn template(&self) -> String {
        "{{name}} must be of type integer".to_string()
    }
}

/// Numbers and numeric strings
#[derive(Debug, Clone, Copy)]
pub struct NumericVal;

impl Rule for NumericVal {
    fn name(&self) -> &'static str {
        "numericVal"
    }

    fn is_valid(&self, input: &Value) -> bool {
        as_number(input).is_some()
    }

    fn template(&self) -> String {
        "{{name}} must be numeric".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoolType;

impl Rule for BoolType {
    fn name(&self) -> &'static str {
        "boolType"
    }

    fn is_valid(&self, input: &Value) -> bool {
        input.is_boolean()
    }

    fn template(&self) -> String {
        "{{name}} must be of type boolean".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ArrayType;

impl Rule for ArrayType {
    fn name(&self) -> &'static str {
        "arrayType"
    }

    fn is_valid(&self, input: &Value) -> bool {
        input.is_array()
    }

    fn template(&self) -> String {
        "{{name}} must be of type array".to_string()
    }
}

// Sizes and ranges

/// Character count of strings, item count of arrays and objects
#[derive(Debug, Clone, Copy, Default)]
pub struct Length {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl Length {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }

    fn measure(input: &Value) -> Option<usize> {
        match input {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        }
    }
}

impl Rule for Length {
    fn name(&self) -> &'static str {
        "length"
    }

    fn is_valid(&self, input: &Value) -> bool {
        match Self::measure(input) {
            Some(len) => {
                self.min.is_none_or(|min| len >= min) && self.max.is_none_or(|max| len <= max)
            }
            None => false,
        }
    }

    fn template(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                format!("{{{{name}}}} must have a length between {} and {}", min, max)
            }
            (Some(min), None) => format!("{{{{name}}}} must have a length greater than or equal to {}", min),
            (None, Some(max)) => format!("{{{{name}}}} must have a length lower than or equal to {}", max),
            (None, None) => "{{name}} must have a length".to_string(),
        }
    }
}

/// Inclusive lower bound on numeric input
#[derive(Debug, Clone, Copy)]
pub struct Min(pub f64);

impl Rule for Min {
    fn name(&self) -> &'static str {
        "min"
    }

    fn is_valid(&self, input: &Value) -> bool {
        as_number(input).is_some_and(|n| n >= self.0)
    }

    fn template(&self) -> String {
        format!(
            "{{{{name}}}} must be greater than or equal to {}",
            format_bound(self.0)
        )
    }
}

/// Inclusive upper bound on numeric input
#[derive(Debug, Clone, Copy)]
pub struct Max(pub f64);

impl Rule for Max {
    fn name(&self) -> &'static str {
        "max"
    }

    fn is_valid(&self, input: &Value) -> bool {
        as_number(input).is_some_and(|n| n <= self.0)
    }

    fn template(&self) -> String {
        format!(
            "{{{{name}}}} must be less than or equal to {}",
            format_bound(self.0)
        )
    }
}

/// Inclusive numeric range
#[derive(Debug, Clone, Copy)]
pub struct Between {
    pub min: f64,
    pub max: f64,
}

impl Rule for Between {
    fn name(&self) -> &'static str {
        "between"
    }

    fn is_valid(&self, input: &Value) -> bool {
        as_number(input).is_some_and(|n| n >= self.min && n <= self.max)
    }

    fn template(&self) -> String {
        format!(
            "{{{{name}}}} must be between {} and {}",
            format_bound(self.min),
            format_bound(self.max)
        )
    }
}

// Formats

#[derive(Debug, Clone, Copy)]
pub struct Email;

impl Rule for Email {
    fn name(&self) -> &'static str {
        "email"
    }

    fn is_valid(&self, input: &Value) -> bool {
        matches_text(&EMAIL_REGEX, input)
    }

    fn template(&self) -> String {
        "{{name}} must be valid email".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Url;

impl Rule for Url {
    fn name(&self) -> &'static str {
        "url"
    }

    fn is_valid(&self, input: &Value) -> bool {
        matches_text(&URL_REGEX, input)
    }

    fn template(&self) -> String {
        "{{name}} must be a URL".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Uuid;

impl Rule for Uuid {
    fn name(&self) -> &'static str {
        "uuid"
    }

    fn is_valid(&self, input: &Value) -> bool {
        matches_text(&UUID_REGEX, input)
    }

    fn template(&self) -> String {
        "{{name}} must be a valid UUID".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Alpha;

impl Rule for Alpha {
    fn name(&self) -> &'static str {
        "alpha"
    }

    fn is_valid(&self, input: &Value) -> bool {
        matches_text(&ALPHA_REGEX, input)
    }

    fn template(&self) -> String {
        "{{name}} must contain only letters (a-z)".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Alnum;

impl Rule for Alnum {
    fn name(&self) -> &'static str {
        "alnum"
    }

    fn is_valid(&self, input: &Value) -> bool {
        matches_text(&ALNUM_REGEX, input)
    }

    fn template(&self) -> String {
        "{{name}} must contain only letters (a-z) and digits (0-9)".to_string()
    }
}

/// Digit strings and non-negative integers
#[derive(Debug, Clone, Copy)]
pub struct Digit;

impl Rule for Digit {
    fn name(&self) -> &'static str {
        "digit"
    }

    fn is_valid(&self, input: &Value) -> bool {
        input.is_u64() || matches_text(&DIGIT_REGEX, input)
    }

    fn template(&self) -> String {
        "{{name}} must contain only digits (0-9)".to_string()
    }
}

/// Custom regex rule
#[derive(Debug, Clone)]
pub struct Matches(pub Regex);

impl Matches {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }
}

impl Rule for Matches {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn is_valid(&self, input: &Value) -> bool {
        matches_text(&self.0, input)
    }

    fn template(&self) -> String {
        format!("{{{{name}}}} must validate against `{}`", self.0.as_str())
    }
}

// Comparisons

#[derive(Debug, Clone)]
pub struct Equals(pub Value);

impl Rule for Equals {
    fn name(&self) -> &'static str {
        "equals"
    }

    fn is_valid(&self, input: &Value) -> bool {
        *input == self.0
    }

    fn template(&self) -> String {
        format!("{{{{name}}}} must equal {}", display_input(&self.0))
    }
}

/// Membership in a fixed set of values
#[derive(Debug, Clone)]
pub struct In(pub Vec<Value>);

impl Rule for In {
    fn name(&self) -> &'static str {
        "in"
    }

    fn is_valid(&self, input: &Value) -> bool {
        self.0.contains(input)
    }

    fn template(&self) -> String {
        format!("{{{{name}}}} must be in {}", Value::Array(self.0.clone()))
    }
}

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Caller-defined rule with an explicit name and message.
#[derive(Clone)]
pub struct Callback {
    name: &'static str,
    predicate: Predicate,
    template: String,
}

impl Callback {
    pub fn new<F>(name: &'static str, predicate: F, template: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            name,
            predicate: Arc::new(predicate),
            template: template.into(),
        }
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback").field("name", &self.name).finish()
    }
}

impl Rule for Callback {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_valid(&self, input: &Value) -> bool {
        (self.predicate)(input)
    }

    fn template(&self) -> String {
        self.template.clone()
    }
}

// Composites

/// Applies a chain to every entry of an array (or value of an object).
#[derive(Debug, Clone)]
pub struct Each(pub RuleChain);

impl Each {
    fn entries(input: &Value) -> Option<Vec<&Value>> {
        match input {
            Value::Array(items) => Some(items.iter().collect()),
            Value::Object(map) => Some(map.values().collect()),
            _ => None,
        }
    }
}

impl Rule for Each {
    fn name(&self) -> &'static str {
        "each"
    }

    fn is_valid(&self, input: &Value) -> bool {
        Self::entries(input).is_some_and(|entries| entries.into_iter().all(|v| self.0.is_valid(v)))
    }

    fn template(&self) -> String {
        "Each item in {{name}} must be valid".to_string()
    }

    fn assert(&self, input: &Value) -> Result<(), RuleFailure> {
        let Some(entries) = Self::entries(input) else {
            return Err(RuleFailure::new(
                self.name(),
                "{{name}} must be iterable",
                input,
            ));
        };

        let children: Vec<RuleFailure> = entries
            .into_iter()
            .filter_map(|entry| self.0.assert(entry).err())
            .flat_map(|failure| failure.children().to_vec())
            .collect();

        if children.is_empty() {
            Ok(())
        } else {
            Err(RuleFailure::new(self.name(), self.template(), input).with_children(children))
        }
    }
}

/// Applies a chain to one property of an object.
#[derive(Debug, Clone)]
pub struct Key {
    pub key: String,
    pub rules: RuleChain,
    pub mandatory: bool,
}

impl Key {
    pub fn new(key: impl Into<String>, rules: RuleChain) -> Self {
        Self {
            key: key.into(),
            rules,
            mandatory: true,
        }
    }

    /// Let the property be absent; it is only checked when present.
    pub fn optional(mut self) -> Self {
        self.mandatory = false;
        self
    }
}

impl Rule for Key {
    fn name(&self) -> &'static str {
        "key"
    }

    fn is_valid(&self, input: &Value) -> bool {
        match input.as_object() {
            Some(map) => match map.get(&self.key) {
                Some(value) => self.rules.is_valid(value),
                None => !self.mandatory,
            },
            None => false,
        }
    }

    fn template(&self) -> String {
        format!("{{{{name}}}} must contain a valid \"{}\"", self.key)
    }

    fn assert(&self, input: &Value) -> Result<(), RuleFailure> {
        let Some(map) = input.as_object() else {
            return Err(RuleFailure::new(self.name(), self.template(), input));
        };

        match map.get(&self.key) {
            Some(value) => self.rules.assert(value).map_err(|failure| {
                let children = failure
                    .children()
                    .iter()
                    .cloned()
                    .map(|child| child.with_name(self.key.clone()))
                    .collect();
                RuleFailure::new(self.name(), self.template(), input).with_children(children)
            }),
            None if self.mandatory => Err(RuleFailure::new(
                self.name(),
                format!("Key {} must be present", self.key),
                input,
            )),
            None => Ok(()),
        }
    }
}

/// Passes null and the empty string, otherwise applies the inner chain.
///
/// Failures of the inner chain are reported as-is, so the inner rule names
/// are the ones messages are resolved for.
#[derive(Debug, Clone)]
pub struct Optional(pub RuleChain);

impl Rule for Optional {
    fn name(&self) -> &'static str {
        "optional"
    }

    fn is_valid(&self, input: &Value) -> bool {
        is_optional_empty(input) || self.0.is_valid(input)
    }

    fn template(&self) -> String {
        "{{name}} must be valid".to_string()
    }

    fn names(&self) -> Vec<&'static str> {
        self.0.names()
    }

    fn assert(&self, input: &Value) -> Result<(), RuleFailure> {
        if is_optional_empty(input) {
            Ok(())
        } else {
            self.0.assert(input)
        }
    }
}
