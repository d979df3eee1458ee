//! Query shapes understood by the authoritative store
//!
//! Only what the caching layer needs: equality and membership conditions over
//! top-level document fields, plus field projection.

use crate::constants::ID_FIELD;
use crate::value_objects::EntityId;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A stored document
pub type Document = Map<String, Value>;

/// Condition on a single field
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value (a missing field equals `null`)
    Eq(Value),
    /// Field equals one of the values
    In(Vec<Value>),
}

impl Condition {
    fn matches(&self, actual: Option<&Value>) -> bool {
        let actual = actual.unwrap_or(&Value::Null);
        match self {
            Self::Eq(expected) => expected == actual,
            Self::In(candidates) => candidates.iter().any(|c| c == actual),
        }
    }
}

/// Conjunction of field conditions, ordered by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: BTreeMap<String, Condition>,
}

impl Filter {
    /// Filter matching every document
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter matching the document with the given id
    pub fn by_id(id: EntityId) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    /// Filter matching any of the given ids
    pub fn by_ids<I: IntoIterator<Item = EntityId>>(ids: I) -> Self {
        Self::new().any_of(ID_FIELD, ids)
    }

    /// Require `field == value`
    pub fn eq<V: Into<Value>>(mut self, field: &str, value: V) -> Self {
        self.conditions
            .insert(field.to_string(), Condition::Eq(value.into()));
        self
    }

    /// Require `field == value` when a value is given
    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    /// Require `field` to equal one of `values`
    pub fn any_of<V, I>(mut self, field: &str, values: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.conditions
            .insert(field.to_string(), Condition::In(values));
        self
    }

    /// Whether the filter has no conditions
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Iterate conditions in field order
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Evaluate the filter against a document
    pub fn matches(&self, document: &Document) -> bool {
        self.conditions
            .iter()
            .all(|(field, condition)| condition.matches(document.get(field)))
    }
}

/// Keep only the projected fields (plus `_id`) of a document
///
/// An empty projection keeps the whole document.
pub fn project(document: &Document, projection: &[&str]) -> Document {
    if projection.is_empty() {
        return document.clone();
    }
    document
        .iter()
        .filter(|(field, _)| field.as_str() == ID_FIELD || projection.contains(&field.as_str()))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}
