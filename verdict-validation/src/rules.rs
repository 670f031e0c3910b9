// Rule chains

use crate::failure::ALL_OF;
use crate::validators::*;
use crate::{Rule, RuleFailure};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// An ordered composition of rules evaluated together against one value.
///
/// ```
/// use verdict_validation::RuleChain;
/// use serde_json::json;
///
/// let username = RuleChain::new().not_empty().string_type().length(Some(3), None);
///
/// assert!(username.is_valid(&json!("alice")));
/// assert_eq!(username.names(), ["notEmpty", "stringType", "length"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleChain {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Normalized names of the rules, in chain order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().flat_map(|rule| rule.names()).collect()
    }

    pub fn is_valid(&self, input: &Value) -> bool {
        self.rules.iter().all(|rule| rule.is_valid(input))
    }

    /// Run every rule; on failure the error is an `allOf` node holding one
    /// child per failed rule, in chain order.
    pub fn assert(&self, input: &Value) -> Result<(), RuleFailure> {
        let children: Vec<RuleFailure> = self
            .rules
            .iter()
            .filter_map(|rule| rule.assert(input).err())
            .collect();

        if children.is_empty() {
            Ok(())
        } else {
            let template = if children.len() == 1 {
                "{{name}} must pass the rule"
            } else {
                "All of the required rules must pass for {{name}}"
            };
            Err(RuleFailure::new(ALL_OF, template, input).with_children(children))
        }
    }

    pub fn not_empty(self) -> Self {
        self.rule(NotEmpty)
    }

    pub fn not_optional(self) -> Self {
        self.rule(NotOptional)
    }

    pub fn string_type(self) -> Self {
        self.rule(StringType)
    }

    pub fn int_type(self) -> Self {
        self.rule(IntType)
    }

    pub fn numeric_val(self) -> Self {
        self.rule(NumericVal)
    }

    pub fn bool_type(self) -> Self {
        self.rule(BoolType)
    }

    pub fn array_type(self) -> Self {
        self.rule(ArrayType)
    }

    pub fn length(self, min: Option<usize>, max: Option<usize>) -> Self {
        self.rule(Length::new(min, max))
    }

    pub fn min(self, min: f64) -> Self {
        self.rule(Min(min))
    }

    pub fn max(self, max: f64) -> Self {
        self.rule(Max(max))
    }

    pub fn between(self, min: f64, max: f64) -> Self {
        self.rule(Between { min, max })
    }

    pub fn email(self) -> Self {
        self.rule(Email)
    }

    pub fn url(self) -> Self {
        self.rule(Url)
    }

    pub fn uuid(self) -> Self {
        self.rule(Uuid)
    }

    pub fn alpha(self) -> Self {
        self.rule(Alpha)
    }

    pub fn alnum(self) -> Self {
        self.rule(Alnum)
    }

    pub fn digit(self) -> Self {
        self.rule(Digit)
    }

    /// Append a regex rule; fails if the pattern does not compile
    pub fn regex(self, pattern: &str) -> Result<Self, regex::Error> {
        Ok(self.rule(Matches::new(pattern)?))
    }

    pub fn equals(self, expected: impl Into<Value>) -> Self {
        self.rule(Equals(expected.into()))
    }

    pub fn in_list<I, V>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.rule(In(allowed.into_iter().map(Into::into).collect()))
    }

    pub fn callback<F>(self, name: &'static str, predicate: F, template: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.rule(Callback::new(name, predicate, template))
    }

    pub fn each(self, rules: RuleChain) -> Self {
        self.rule(Each(rules))
    }

    pub fn key(self, key: impl Into<String>, rules: RuleChain) -> Self {
        self.rule(Key::new(key, rules))
    }

    pub fn optional(self, rules: RuleChain) -> Self {
        self.rule(Optional(rules))
    }
}

impl fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chain_passes() {
        let chain = RuleChain::new().not_empty().email();
        assert!(chain.assert(&json!("test@example.com")).is_ok());
        assert!(chain.is_valid(&json!("test@example.com")));
    }

    #[test]
    fn test_chain_collects_every_failure() {
        let chain = RuleChain::new().not_empty().string_type().length(Some(3), None);
        let failure = chain.assert(&json!("")).unwrap_err();

        assert_eq!(failure.rule(), "allOf");
        let failed: Vec<_> = failure.children().iter().map(RuleFailure::rule).collect();
        assert_eq!(failed, ["notEmpty", "length"]);
    }

    #[test]
    fn test_empty_chain_never_fails() {
        let chain = RuleChain::new();
        assert!(chain.is_empty());
        assert!(chain.names().is_empty());
        assert!(chain.assert(&json!(null)).is_ok());
    }

    #[test]
    fn test_optional_exposes_inner_names() {
        let chain = RuleChain::new().optional(RuleChain::new().email().length(None, Some(64)));
        assert_eq!(chain.names(), ["email", "length"]);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_regex_builder() {
        assert!(RuleChain::new().regex("[").is_err());
        let chain = RuleChain::new().regex(r"^[A-Z]{2}$").unwrap();
        assert!(chain.is_valid(&json!("NO")));
        assert!(!chain.is_valid(&json!("no")));
    }

    #[test]
    fn test_in_list_builder() {
        let chain = RuleChain::new().in_list(["draft", "published"]);
        assert!(chain.is_valid(&json!("draft")));
        assert!(!chain.is_valid(&json!("deleted")));
    }

    #[test]
    fn test_debug_lists_names() {
        let chain = RuleChain::new().not_empty().int_type();
        assert_eq!(format!("{:?}", chain), r#"["notEmpty", "intType"]"#);
    }
}
