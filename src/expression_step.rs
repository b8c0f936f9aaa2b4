//! Expression steps and the resolution and matching algorithms.
//!
//! An [`ExpressionStep`] is one unit of a path pattern. It either pins a
//! traversal exactly (a specific name, index, key, or value), matches any
//! element of one collection kind (a wildcard), or steps up to the parent of
//! the location built so far.
//!
//! Parent steps carry no match semantics of their own: [`ExpressionSteps::resolve`]
//! eliminates them before any matching takes place. A parent step applied
//! beyond the first step collapses the whole sequence to empty, and an empty
//! resolved sequence matches nothing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::step::{PathStep, PathSteps};
use crate::value::AttributeValue;

/// A single step within a path expression.
///
/// Wildcard variants match every concrete step of their collection kind.
/// Matching a concrete step of the wrong kind is always false, never an
/// error.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    rename_all = "snake_case",
    bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>")
)]
pub enum ExpressionStep<V: AttributeValue = serde_json::Value> {
    /// Match the attribute with exactly the given name (case-sensitive).
    AttributeNameExact(String),
    /// Match the list element at exactly the given index.
    ElementKeyIntExact(i64),
    /// Match any list element, regardless of index.
    ElementKeyIntAny,
    /// Match the map element under exactly the given key.
    ElementKeyStringExact(String),
    /// Match any map element, regardless of key.
    ElementKeyStringAny,
    /// Match the set element equal to the given value.
    ElementKeyValueExact(V),
    /// Match any set element, regardless of value.
    ElementKeyValueAny,
    /// Step up to the parent of the location built so far.
    ///
    /// Eliminated by [`ExpressionSteps::resolve`]; never evaluated directly
    /// during matching.
    Parent,
}

impl<V: AttributeValue> ExpressionStep<V> {
    /// Whether this step matches the given concrete step.
    ///
    /// [`ExpressionStep::Parent`] never matches; it is expected to have been
    /// removed by resolution before matching occurs.
    pub fn matches(&self, step: &PathStep<V>) -> bool {
        match (self, step) {
            (Self::AttributeNameExact(name), PathStep::AttributeName(other)) => name == other,
            (Self::ElementKeyIntExact(index), PathStep::ElementKeyInt(other)) => index == other,
            (Self::ElementKeyIntAny, PathStep::ElementKeyInt(_)) => true,
            (Self::ElementKeyStringExact(key), PathStep::ElementKeyString(other)) => key == other,
            (Self::ElementKeyStringAny, PathStep::ElementKeyString(_)) => true,
            (Self::ElementKeyValueExact(value), PathStep::ElementKeyValue(other)) => {
                value.equal(other)
            },
            (Self::ElementKeyValueAny, PathStep::ElementKeyValue(_)) => true,
            _ => false,
        }
    }
}

impl<V: AttributeValue> PartialEq for ExpressionStep<V> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AttributeNameExact(name), Self::AttributeNameExact(other)) => name == other,
            (Self::ElementKeyIntExact(index), Self::ElementKeyIntExact(other)) => index == other,
            (Self::ElementKeyIntAny, Self::ElementKeyIntAny) => true,
            (Self::ElementKeyStringExact(key), Self::ElementKeyStringExact(other)) => key == other,
            (Self::ElementKeyStringAny, Self::ElementKeyStringAny) => true,
            (Self::ElementKeyValueExact(value), Self::ElementKeyValueExact(other)) => {
                value.equal(other)
            },
            (Self::ElementKeyValueAny, Self::ElementKeyValueAny) => true,
            (Self::Parent, Self::Parent) => true,
            _ => false,
        }
    }
}

impl<V: AttributeValue> fmt::Display for ExpressionStep<V> {
    /// Renders the step for diagnostics: exact forms render like their
    /// concrete counterparts, wildcards as `[*]` / `["*"]` / `[Value(*)]`,
    /// and the parent marker as `<`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AttributeNameExact(name) => f.write_str(name),
            Self::ElementKeyIntExact(index) => write!(f, "[{}]", index),
            Self::ElementKeyIntAny => f.write_str("[*]"),
            Self::ElementKeyStringExact(key) => write!(f, "[\"{}\"]", key),
            Self::ElementKeyStringAny => f.write_str("[\"*\"]"),
            Self::ElementKeyValueExact(value) => write!(f, "[Value({})]", value.render()),
            Self::ElementKeyValueAny => f.write_str("[Value(*)]"),
            Self::Parent => f.write_str("<"),
        }
    }
}

/// An ordered sequence of expression steps.
///
/// Carries the two core algorithms of the engine: [`resolve`](Self::resolve),
/// which eliminates parent steps, and [`matches`](Self::matches) /
/// [`matches_parent`](Self::matches_parent), which compare the resolved
/// sequence against concrete path steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>")
)]
pub struct ExpressionSteps<V: AttributeValue = serde_json::Value>(Vec<ExpressionStep<V>>);

impl<V: AttributeValue> ExpressionSteps<V> {
    /// Create an empty step sequence.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a step to the end of the sequence.
    pub fn append(&mut self, step: ExpressionStep<V>) {
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
    pub fn iter(&self) -> std::slice::Iter<'_, ExpressionStep<V>> {
        self.0.iter()
    }

    /// Eliminate every parent step by collapsing it against the step that
    /// precedes it, left to right.
    ///
    /// A parent step pops the last accumulated step. A parent step with
    /// nothing left to pop has walked above the schema root; the whole
    /// sequence degrades to empty and stays empty, which matches nothing.
    /// Resolution never fails and is idempotent.
    pub fn resolve(&self) -> Self {
        let mut result: Vec<ExpressionStep<V>> = Vec::with_capacity(self.0.len());

        for step in &self.0 {
            match step {
                ExpressionStep::Parent => {
                    if result.pop().is_none() {
                        // Walked above the root; nothing further can resolve.
                        return Self::new();
                    }
                },
                other => result.push(other.clone()),
            }
        }

        Self(result)
    }

    /// Whether the resolved sequence matches the given concrete steps
    /// exactly.
    ///
    /// Requires equal lengths and a per-index step match, in order, with no
    /// skipping. A sequence that resolves to empty matches nothing,
    /// including the empty path.
    pub fn matches(&self, path_steps: &PathSteps<V>) -> bool {
        let resolved = self.resolve();

        // Empty never matches, to prevent a degenerate resolve from
        // producing false positives against the empty path.
        if resolved.is_empty() {
            return false;
        }

        let matched = resolved.len() == path_steps.len()
            && resolved
                .iter()
                .zip(path_steps.iter())
                .all(|(expression_step, path_step)| expression_step.matches(path_step));

        trace!(
            expression = %resolved,
            path = %path_steps,
            matched,
            "matched path against expression"
        );

        matched
    }

    /// Whether the given concrete steps are a strict prefix of a location
    /// the resolved sequence could match.
    ///
    /// Answers "could descending further from this path still reach a match",
    /// which lets schema walkers prune traversal early. The path must be
    /// strictly shorter than the resolved sequence; an equal-length path is
    /// the location itself, not a parent of it.
    pub fn matches_parent(&self, path_steps: &PathSteps<V>) -> bool {
        let resolved = self.resolve();

        if resolved.is_empty() {
            return false;
        }

        if path_steps.len() >= resolved.len() {
            return false;
        }

        let matched = path_steps
            .iter()
            .zip(resolved.iter())
            .all(|(path_step, expression_step)| expression_step.matches(path_step));

        trace!(
            expression = %resolved,
            path = %path_steps,
            matched,
            "matched path against expression parent"
        );

        matched
    }
}

impl<V: AttributeValue> Default for ExpressionSteps<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: AttributeValue> PartialEq for ExpressionSteps<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V: AttributeValue> From<Vec<ExpressionStep<V>>> for ExpressionSteps<V> {
    fn from(steps: Vec<ExpressionStep<V>>) -> Self {
        Self(steps)
    }
}

impl<V: AttributeValue> IntoIterator for ExpressionSteps<V> {
    type Item = ExpressionStep<V>;
    type IntoIter = std::vec::IntoIter<ExpressionStep<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V: AttributeValue> IntoIterator for &'a ExpressionSteps<V> {
    type Item = &'a ExpressionStep<V>;
    type IntoIter = std::slice::Iter<'a, ExpressionStep<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V: AttributeValue> fmt::Display for ExpressionSteps<V> {
    /// Dot-joins attribute-name and parent steps and concatenates bracket
    /// steps directly, e.g. `network[*].<.name`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.0.iter().enumerate() {
            if position != 0
                && matches!(
                    step,
                    ExpressionStep::AttributeNameExact(_) | ExpressionStep::Parent
                )
            {
                f.write_str(".")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
