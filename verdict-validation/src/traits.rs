// Extension points: rules and parameter sources

use crate::RuleFailure;
use serde_json::Value;

/// A single predicate inside a [`RuleChain`](crate::RuleChain).
///
/// `name` is the rule's normalized identifier (lower camel case, e.g.
/// `notEmpty`). Message overrides are keyed by it, so it must be stable.
pub trait Rule: Send + Sync {
    /// Normalized rule name
    fn name(&self) -> &'static str;

    /// Check the input without building a failure
    fn is_valid(&self, input: &Value) -> bool;

    /// Default failure message; may contain `{{name}}` and `{{input}}`
    fn template(&self) -> String;

    /// Names contributed to a chain's rule list.
    ///
    /// Wrappers that report their inner rules' failures directly override
    /// this to expose the inner names.
    fn names(&self) -> Vec<&'static str> {
        vec![self.name()]
    }

    /// Check the input, describing the failure when it does not pass.
    fn assert(&self, input: &Value) -> Result<(), RuleFailure> {
        if self.is_valid(input) {
            Ok(())
        } else {
            Err(RuleFailure::new(self.name(), self.template(), input))
        }
    }
}

/// Something named values can be read from.
pub trait ParamSource {
    /// The value stored under `name`, if any
    fn value(&self, name: &str) -> Option<Value>;

    /// The value stored under `name`, or `default` when absent
    fn value_or(&self, name: &str, default: Value) -> Value {
        self.value(name).unwrap_or(default)
    }
}

/// Normalize a rule implementation's path into its rule name.
///
/// Strips any `::` namespace and lowercases the first character, so
/// `my_app::rules::PostalCode` becomes `postalCode`.
pub fn normalize_rule_name(path: &str) -> String {
    let short = path.rsplit("::").next().unwrap_or(path);
    let mut chars = short.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
