//! Concrete path steps and ordered step sequences.
//!
//! A [`PathStep`] is a single traversal unit within a schema: into a named
//! attribute, a list element, a map element, or a set element. A
//! [`PathSteps`] is the ordered sequence of those steps that makes up a
//! [`Path`](crate::Path).
//!
//! Concrete steps never contain wildcards or relative markers; those belong
//! to [`ExpressionStep`](crate::ExpressionStep).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression_step::{ExpressionStep, ExpressionSteps};
use crate::value::AttributeValue;

/// A single concrete traversal step within a schema.
///
/// Steps are immutable once created. Equality between steps of different
/// kinds is always false; set-value steps compare via the value's own
/// [`AttributeValue::equal`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    rename_all = "snake_case",
    bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>")
)]
pub enum PathStep<V: AttributeValue = serde_json::Value> {
    /// Traverse into the attribute with the given name.
    AttributeName(String),
    /// Traverse into the list element at the given index.
    ///
    /// Indexes are 64-bit to match the protocol encoding.
    ElementKeyInt(i64),
    /// Traverse into the map element under the given key.
    ElementKeyString(String),
    /// Traverse into the set element identified by the given value.
    ElementKeyValue(V),
}

impl<V: AttributeValue> PathStep<V> {
    /// Convert this step into its exact expression-step counterpart.
    ///
    /// Attribute names, indexes, and keys map to the corresponding
    /// exact-match expression steps; set values map to an exact-value match
    /// using the value's own equality.
    pub fn expression_step(&self) -> ExpressionStep<V> {
        match self {
            Self::AttributeName(name) => ExpressionStep::AttributeNameExact(name.clone()),
            Self::ElementKeyInt(index) => ExpressionStep::ElementKeyIntExact(*index),
            Self::ElementKeyString(key) => ExpressionStep::ElementKeyStringExact(key.clone()),
            Self::ElementKeyValue(value) => ExpressionStep::ElementKeyValueExact(value.clone()),
        }
    }
}

impl<V: AttributeValue> PartialEq for PathStep<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AttributeName(name), Self::AttributeName(other)) => name == other,
            (Self::ElementKeyInt(index), Self::ElementKeyInt(other)) => index == other,
            (Self::ElementKeyString(key), Self::ElementKeyString(other)) => key == other,
            (Self::ElementKeyValue(value), Self::ElementKeyValue(other)) => value.equal(other),
            _ => false,
        }
    }
}

impl<V: AttributeValue> fmt::Display for PathStep<V> {
    /// Renders the step for diagnostics: `name` for attribute names (the
    /// sequence rendering adds the joining dot), `[n]` for list indexes,
    /// `["key"]` for map keys, and `[Value(repr)]` for set values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeName(name) => f.write_str(name),
            Self::ElementKeyInt(index) => write!(f, "[{}]", index),
            Self::ElementKeyString(key) => write!(f, "[\"{}\"]", key),
            Self::ElementKeyValue(value) => write!(f, "[Value({})]", value.render()),
        }
    }
}

/// An ordered sequence of concrete path steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>")
)]
pub struct PathSteps<V: AttributeValue = serde_json::Value>(Vec<PathStep<V>>);

impl<V: AttributeValue> PathSteps<V> {
    /// Create an empty step sequence.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a step to the end of the sequence.
    pub fn append(&mut self, step: PathStep<V>) {
        self.0.push(step);
    }

    /// The number of steps in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence contains no steps.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the steps in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathStep<V>> {
        self.0.iter()
    }

    /// Split off the first step, returning it with the remaining steps.
    ///
    /// Returns `None` if the sequence is empty. Used by schema walkers that
    /// descend one level at a time.
    pub fn next_step(&self) -> Option<(PathStep<V>, PathSteps<V>)> {
        let (first, rest) = self.0.split_first()?;
        Some((first.clone(), Self(rest.to_vec())))
    }

    /// Split off the last step, returning the leading steps with it.
    ///
    /// Returns `None` if the sequence is empty.
    pub fn last_step(&self) -> Option<(PathSteps<V>, PathStep<V>)> {
        let (last, rest) = self.0.split_last()?;
        Some((Self(rest.to_vec()), last.clone()))
    }

    /// Map every concrete step to its exact expression-step form.
    ///
    /// Order is preserved. This is how a [`Path`](crate::Path) becomes an
    /// [`Expression`](crate::Expression).
    pub fn expression_steps(&self) -> ExpressionSteps<V> {
        let mut steps = ExpressionSteps::new();
        for step in &self.0 {
            steps.append(step.expression_step());
        }
        steps
    }
}

impl<V: AttributeValue> Default for PathSteps<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: AttributeValue> PartialEq for PathSteps<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V: AttributeValue> From<Vec<PathStep<V>>> for PathSteps<V> {
    fn from(steps: Vec<PathStep<V>>) -> Self {
        Self(steps)
    }
}

impl<V: AttributeValue> IntoIterator for PathSteps<V> {
    type Item = PathStep<V>;
    type IntoIter = std::vec::IntoIter<PathStep<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V: AttributeValue> IntoIterator for &'a PathSteps<V> {
    type Item = &'a PathStep<V>;
    type IntoIter = std::slice::Iter<'a, PathStep<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V: AttributeValue> fmt::Display for PathSteps<V> {
    /// Dot-joins attribute-name steps and concatenates bracket steps
    /// directly, e.g. `network[0].subnet["internal"]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.0.iter().enumerate() {
            if position != 0 && matches!(step, PathStep::AttributeName(_)) {
                f.write_str(".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
