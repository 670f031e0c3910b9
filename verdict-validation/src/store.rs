//! Error and value storage
//!
//! Both stores are keyed by [`FieldKey`], which pairs an optional group with
//! the field name. Grouped and ungrouped keys never alias: `("user", "name")`
//! and `"name"` are unrelated slots.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;

/// A field name, optionally namespaced by a group.
///
/// Converting from a tuple reads it as `(group, key)`, group first:
/// `validator.first_error(("address", "city"))` reads field `city` of group
/// `address`. A bare `&str` or `String` is an ungrouped key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    group: Option<String>,
    key: String,
}

impl FieldKey {
    /// An ungrouped key
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            group: None,
            key: key.into(),
        }
    }

    /// A key inside `group`
    pub fn grouped(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: Some(group.into()),
            key: key.into(),
        }
    }

    /// A key inside `group` when one is given
    pub fn scoped(key: impl Into<String>, group: Option<&str>) -> Self {
        Self {
            group: group.map(str::to_string),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{}.{}", group, self.key),
            None => f.write_str(&self.key),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(key: &str) -> Self {
        FieldKey::new(key)
    }
}

impl From<String> for FieldKey {
    fn from(key: String) -> Self {
        FieldKey::new(key)
    }
}

/// `(group, key)`
impl From<(&str, &str)> for FieldKey {
    fn from((group, key): (&str, &str)) -> Self {
        FieldKey::grouped(group, key)
    }
}

impl From<&FieldKey> for FieldKey {
    fn from(key: &FieldKey) -> Self {
        key.clone()
    }
}

/// One stored error message, with the rule it came from when rule names are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    pub rule: Option<String>,
    pub message: String,
}

impl ErrorEntry {
    /// A message without a rule name
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            rule: None,
            message: message.into(),
        }
    }

    /// A message tagged with the rule that produced it
    pub fn keyed(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule: Some(rule.into()),
            message: message.into(),
        }
    }
}

impl From<&str> for ErrorEntry {
    fn from(message: &str) -> Self {
        ErrorEntry::message(message)
    }
}

impl From<String> for ErrorEntry {
    fn from(message: String) -> Self {
        ErrorEntry::message(message)
    }
}

/// Slots render as an object of rule to message when every entry carries a
/// rule name, otherwise as an array of messages.
fn slot_to_json(entries: &[ErrorEntry]) -> Value {
    if !entries.is_empty() && entries.iter().all(|entry| entry.rule.is_some()) {
        Value::Object(
            entries
                .iter()
                .map(|entry| {
                    (
                        entry.rule.clone().unwrap_or_default(),
                        Value::String(entry.message.clone()),
                    )
                })
                .collect(),
        )
    } else {
        Value::Array(
            entries
                .iter()
                .map(|entry| Value::String(entry.message.clone()))
                .collect(),
        )
    }
}

/// Nest grouped entries under their group name.
///
/// A group whose name is also an ungrouped field is not nested; its entries
/// render flat as `group.key` next to the field so neither side is lost.
fn nest<'a, T>(
    entries: impl Iterator<Item = (&'a FieldKey, T)>,
    render: impl Fn(T) -> Value,
) -> Value {
    let entries: Vec<(&'a FieldKey, T)> = entries.collect();
    let fields: HashSet<&'a str> = entries
        .iter()
        .map(|&(key, _)| key)
        .filter(|key| key.group().is_none())
        .map(FieldKey::key)
        .collect();

    let mut root = Map::new();
    for (key, item) in entries {
        match key.group() {
            Some(group) if !fields.contains(group) => {
                let slot = root
                    .entry(group.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(map) = slot {
                    map.insert(key.key().to_string(), render(item));
                }
            }
            Some(_) => {
                root.insert(key.to_string(), render(item));
            }
            None => {
                root.insert(key.key().to_string(), render(item));
            }
        }
    }
    Value::Object(root)
}

/// Error messages per field, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorStore {
    slots: IndexMap<FieldKey, Vec<ErrorEntry>>,
}

impl ErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot for `key`
    pub fn set(&mut self, key: FieldKey, entries: Vec<ErrorEntry>) {
        self.slots.insert(key, entries);
    }

    /// Replace every slot
    pub fn replace_all(&mut self, slots: impl IntoIterator<Item = (FieldKey, Vec<ErrorEntry>)>) {
        self.slots = slots.into_iter().collect();
    }

    /// Append one entry, creating the slot if needed
    pub fn push(&mut self, key: FieldKey, entry: ErrorEntry) {
        self.slots.entry(key).or_default().push(entry);
    }

    /// The slot for `key`; empty when absent
    pub fn get(&self, key: &FieldKey) -> &[ErrorEntry] {
        self.slots.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a slot exists for `key`, even an emptied one
    pub fn contains(&self, key: &FieldKey) -> bool {
        self.slots.contains_key(key)
    }

    /// Slots of one group, keyed by field name
    pub fn group(&self, group: &str) -> Vec<(&str, &[ErrorEntry])> {
        self.slots
            .iter()
            .filter(|(key, _)| key.group() == Some(group))
            .map(|(key, entries)| (key.key(), entries.as_slice()))
            .collect()
    }

    /// Message at `index` in the slot for `key`; empty when out of range
    pub fn nth(&self, key: &FieldKey, index: usize) -> &str {
        self.get(key)
            .get(index)
            .map(|entry| entry.message.as_str())
            .unwrap_or("")
    }

    pub fn first(&self, key: &FieldKey) -> &str {
        self.nth(key, 0)
    }

    /// Messages of the slot for `key`, without rule names
    pub fn messages(&self, key: &FieldKey) -> Vec<&str> {
        self.get(key)
            .iter()
            .map(|entry| entry.message.as_str())
            .collect()
    }

    /// Empty the slot for `key`. Absent slots are left absent.
    pub fn clear_slot(&mut self, key: &FieldKey) {
        if let Some(entries) = self.slots.get_mut(key) {
            entries.clear();
        }
    }

    /// Empty every slot of `group`
    pub fn clear_group(&mut self, group: &str) {
        self.slots
            .iter_mut()
            .filter(|(key, _)| key.group() == Some(group))
            .for_each(|(_, entries)| entries.clear());
    }

    /// Empty every slot
    pub fn clear_all(&mut self) {
        self.slots.values_mut().for_each(Vec::clear);
    }

    /// True when no slot holds a message
    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }

    /// Top-level entries holding messages: each ungrouped field counts once,
    /// and each group counts once however many of its fields failed.
    pub fn count(&self) -> usize {
        let mut groups: Vec<&str> = Vec::new();
        let mut count = 0;
        for (key, entries) in &self.slots {
            if entries.is_empty() {
                continue;
            }
            match key.group() {
                Some(group) if groups.contains(&group) => {}
                Some(group) => {
                    groups.push(group);
                    count += 1;
                }
                None => count += 1,
            }
        }
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &[ErrorEntry])> {
        self.slots
            .iter()
            .map(|(key, entries)| (key, entries.as_slice()))
    }

    /// JSON view with grouped fields nested under their group.
    pub fn to_json(&self) -> Value {
        nest(self.slots.iter(), |entries| slot_to_json(entries))
    }
}

impl Serialize for ErrorStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl FromIterator<(FieldKey, Vec<ErrorEntry>)> for ErrorStore {
    fn from_iter<I: IntoIterator<Item = (FieldKey, Vec<ErrorEntry>)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Last value seen for each field, valid or not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    values: IndexMap<FieldKey, Value>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: FieldKey, value: Value) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: &FieldKey) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn replace_all(&mut self, values: impl IntoIterator<Item = (FieldKey, Value)>) {
        self.values = values.into_iter().collect();
    }

    /// Values of one group, keyed by field name
    pub fn group(&self, group: &str) -> Vec<(&str, &Value)> {
        self.values
            .iter()
            .filter(|(key, _)| key.group() == Some(group))
            .map(|(key, value)| (key.key(), value))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &Value)> {
        self.values.iter()
    }

    /// JSON view with grouped fields nested under their group.
    pub fn to_json(&self) -> Value {
        nest(self.values.iter(), Value::clone)
    }
}

impl Serialize for ValueStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl FromIterator<(FieldKey, Value)> for ValueStore {
    fn from_iter<I: IntoIterator<Item = (FieldKey, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
