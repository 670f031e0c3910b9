//! Nested rule failures
//!
//! A failed [`RuleChain`](crate::RuleChain) reports a tree rooted at `allOf`
//! with one node per failed sub-rule. Composite rules (`each`, `key`) add
//! their own children. Messages are looked up in the tree by normalized rule
//! name.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// Name of the root node produced by a failing chain
pub const ALL_OF: &str = "allOf";

/// One failed rule, with the failures of any nested rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    rule: String,
    template: String,
    input: Value,
    name: Option<String>,
    children: Vec<RuleFailure>,
}

impl RuleFailure {
    pub fn new(rule: impl Into<String>, template: impl Into<String>, input: &Value) -> Self {
        Self {
            rule: rule.into(),
            template: template.into(),
            input: input.clone(),
            name: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RuleFailure>) -> Self {
        self.children = children;
        self
    }

    /// Set the display name used for `{{name}}` on this node.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Normalized name of the rule that failed
    pub fn rule(&self) -> &str {
        &self.rule
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn children(&self) -> &[RuleFailure] {
        &self.children
    }

    /// Name every node that does not carry one yet.
    pub fn name_unnamed(&mut self, name: &str) {
        if self.name.is_none() {
            self.name = Some(name.to_string());
        }
        for child in &mut self.children {
            child.name_unnamed(name);
        }
    }

    /// The default message of this node.
    pub fn message(&self) -> String {
        self.render(&self.template)
    }

    /// Substitute `{{name}}` and `{{input}}` in `template` with this node's values.
    pub fn render(&self, template: &str) -> String {
        let input = display_input(&self.input);
        let name = self.name.as_deref().unwrap_or(&input);
        template
            .replace("{{name}}", name)
            .replace("{{input}}", &input)
    }

    /// Pre-order walk over this node and all descendants.
    pub fn iter(&self) -> Failures<'_> {
        Failures { stack: vec![self] }
    }

    fn find(&self, rule: &str) -> Option<&RuleFailure> {
        self.iter().filter(|failure| failure.rule == rule).last()
    }

    /// Default messages of the named rules that failed anywhere in the tree.
    ///
    /// Names that did not fail are left out. When a name occurs more than
    /// once in the tree, the last occurrence in pre-order wins.
    pub fn find_messages<S: AsRef<str>>(&self, names: &[S]) -> IndexMap<String, String> {
        let mut messages = IndexMap::new();
        for name in names {
            let name = name.as_ref();
            if let Some(failure) = self.find(name) {
                messages.insert(name.to_string(), failure.message());
            }
        }
        messages
    }

    /// Like [`find_messages`](Self::find_messages), rendering the supplied
    /// template for each failed rule instead of its default.
    pub fn find_templated(&self, templates: &IndexMap<String, String>) -> IndexMap<String, String> {
        templates
            .iter()
            .filter_map(|(name, template)| {
                self.find(name)
                    .map(|failure| (name.clone(), failure.render(template)))
            })
            .collect()
    }

    /// Default messages of every leaf failure, in pre-order.
    pub fn leaf_messages(&self) -> Vec<String> {
        self.iter()
            .filter(|failure| failure.children.is_empty())
            .map(RuleFailure::message)
            .collect()
    }
}

impl fmt::Display for RuleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(node: &RuleFailure, depth: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if node.rule != ALL_OF || depth > 0 {
                writeln!(f, "{:indent$}- {}", "", node.message(), indent = depth * 2)?;
            }
            let depth = if node.rule == ALL_OF && depth == 0 { 0 } else { depth + 1 };
            for child in &node.children {
                write_node(child, depth, f)?;
            }
            Ok(())
        }
        write_node(self, 0, f)
    }
}

impl std::error::Error for RuleFailure {}

/// Iterator returned by [`RuleFailure::iter`].
pub struct Failures<'a> {
    stack: Vec<&'a RuleFailure>,
}

impl<'a> Iterator for Failures<'a> {
    type Item = &'a RuleFailure;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Render an input for messages: strings are quoted, everything else is JSON.
pub(crate) fn display_input(input: &Value) -> String {
    match input {
        Value::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}
