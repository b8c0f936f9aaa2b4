//! Path expressions: patterns over concrete paths.
//!
//! An [`Expression`] describes a set of schema locations rather than one. It
//! supports everything a [`Path`](crate::Path) does, plus wildcard steps
//! (any list index, any map key, any set value) and parent-relative steps.
//!
//! Expressions are either root-anchored ([`Expression::match_root`]) or
//! relative fragments ([`Expression::match_relative`]) meant to be combined
//! with another expression via [`Expression::merge`]. This is how a
//! validator declared on one attribute can point at a sibling: it exports a
//! relative fragment like `<.other`, and the framework merges it onto the
//! attribute's own expression.
//!
//! # Example
//!
//! ```
//! use hemmer_attribute_path::{Expression, Path};
//!
//! let expression: Expression = Expression::match_root("tags").at_any_map_key();
//!
//! assert!(expression.matches(&Path::root("tags").at_map_key("env")));
//! assert!(!expression.matches(&Path::root("tags")));
//! assert_eq!(expression.to_string(), "tags[\"*\"]");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression_step::{ExpressionStep, ExpressionSteps};
use crate::path::Path;
use crate::value::AttributeValue;

/// A pattern over concrete attribute paths.
///
/// Immutable under the same copy-on-write discipline as
/// [`Path`](crate::Path): every builder method returns a new expression.
/// The default expression is an empty, non-root fragment and matches
/// nothing.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>"))]
pub struct Expression<V: AttributeValue = serde_json::Value> {
    steps: ExpressionSteps<V>,
    root: bool,
}

impl<V: AttributeValue> Expression<V> {
    /// Create a root-anchored expression matching the root-level attribute
    /// with the given name.
    pub fn match_root(name: impl Into<String>) -> Self {
        let mut steps = ExpressionSteps::new();
        steps.append(ExpressionStep::AttributeNameExact(name.into()));
        Self { steps, root: true }
    }

    /// Create an empty relative expression, meant to be combined with
    /// another expression via [`merge`](Self::merge).
    pub fn match_relative() -> Self {
        Self {
            steps: ExpressionSteps::new(),
            root: false,
        }
    }

    pub(crate) fn root_from_steps(steps: ExpressionSteps<V>) -> Self {
        Self { steps, root: true }
    }

    /// Return a new expression with an exact attribute-name step appended.
    pub fn at_name(&self, name: impl Into<String>) -> Self {
        let mut expression = self.clone();
        expression
            .steps
            .append(ExpressionStep::AttributeNameExact(name.into()));
        expression
    }

    /// Return a new expression with an exact list-index step appended.
    pub fn at_list_index(&self, index: i64) -> Self {
        let mut expression = self.clone();
        expression
            .steps
            .append(ExpressionStep::ElementKeyIntExact(index));
        expression
    }

    /// Return a new expression matching any list index at this position.
    pub fn at_any_list_index(&self) -> Self {
        let mut expression = self.clone();
        expression.steps.append(ExpressionStep::ElementKeyIntAny);
        expression
    }

    /// Return a new expression with an exact map-key step appended.
    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        let mut expression = self.clone();
        expression
            .steps
            .append(ExpressionStep::ElementKeyStringExact(key.into()));
        expression
    }

    /// Return a new expression matching any map key at this position.
    pub fn at_any_map_key(&self) -> Self {
        let mut expression = self.clone();
        expression.steps.append(ExpressionStep::ElementKeyStringAny);
        expression
    }

    /// Return a new expression with an exact set-value step appended.
    pub fn at_set_value(&self, value: V) -> Self {
        let mut expression = self.clone();
        expression
            .steps
            .append(ExpressionStep::ElementKeyValueExact(value));
        expression
    }

    /// Return a new expression matching any set value at this position.
    pub fn at_any_set_value(&self) -> Self {
        let mut expression = self.clone();
        expression.steps.append(ExpressionStep::ElementKeyValueAny);
        expression
    }

    /// Return a new expression with a parent step appended.
    ///
    /// Parent steps are eliminated by [`resolve`](Self::resolve) before
    /// matching; stepping above the schema root degrades the expression to
    /// one that matches nothing.
    pub fn at_parent(&self) -> Self {
        let mut expression = self.clone();
        expression.steps.append(ExpressionStep::Parent);
        expression
    }

    /// Whether this expression matches the given path exactly.
    pub fn matches(&self, path: &Path<V>) -> bool {
        self.steps.matches(path.steps_ref())
    }

    /// Whether the given path is a strict ancestor of a location this
    /// expression could match.
    ///
    /// Used to prune schema traversal: if a path is not a matching parent,
    /// nothing beneath it can match either.
    pub fn matches_parent(&self, path: &Path<V>) -> bool {
        self.steps.matches_parent(path.steps_ref())
    }

    /// Combine this expression with another.
    ///
    /// A root-anchored `other` replaces the receiver entirely, restarting
    /// from the schema root. A relative `other` has its steps appended to
    /// the receiver's.
    pub fn merge(&self, other: &Expression<V>) -> Self {
        if other.root {
            return other.clone();
        }

        let mut merged = self.clone();
        for step in other.steps.iter() {
            merged.steps.append(step.clone());
        }
        merged
    }

    /// Merge each of `others` onto this expression.
    ///
    /// With an empty `others`, returns a collection holding just this
    /// expression, so callers can treat "validate against self" and
    /// "validate against others" uniformly.
    pub fn merge_expressions(&self, others: &[Expression<V>]) -> Expressions<V> {
        let mut result = Expressions::new();

        if others.is_empty() {
            result.append(self.clone());
            return result;
        }

        for other in others {
            result.append(self.merge(other));
        }
        result
    }

    /// Return this expression with all parent steps eliminated.
    ///
    /// Useful before rendering, so diagnostics show the location an
    /// expression points at rather than the relative steps used to build it.
    pub fn resolve(&self) -> Self {
        Self {
            steps: self.steps.resolve(),
            root: self.root,
        }
    }

    /// Whether this expression was anchored at the schema root.
    pub fn is_root(&self) -> bool {
        self.root
    }

    /// The steps of this expression, as a defensive copy.
    pub fn steps(&self) -> ExpressionSteps<V> {
        self.steps.clone()
    }
}

impl<V: AttributeValue> Default for Expression<V> {
    /// An empty relative expression, which matches nothing.
    fn default() -> Self {
        Self::match_relative()
    }
}

impl<V: AttributeValue> PartialEq for Expression<V> {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.steps == other.steps
    }
}

impl<V: AttributeValue> From<Path<V>> for Expression<V> {
    fn from(path: Path<V>) -> Self {
        path.expression()
    }
}

impl<V: AttributeValue> fmt::Display for Expression<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.steps)
    }
}

/// An ordered collection of expressions without duplicates.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>")
)]
pub struct Expressions<V: AttributeValue = serde_json::Value>(Vec<Expression<V>>);

impl<V: AttributeValue> Expressions<V> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add an expression unless an equal one is already present.
    pub fn append(&mut self, expression: Expression<V>) {
        if !self.contains(&expression) {
            self.0.push(expression);
        }
    }

    /// Whether the collection contains an expression equal to the given one.
    pub fn contains(&self, expression: &Expression<V>) -> bool {
        self.0.iter().any(|candidate| candidate == expression)
    }

    /// Whether any expression in the collection matches the given path.
    pub fn matches(&self, path: &Path<V>) -> bool {
        self.0.iter().any(|expression| expression.matches(path))
    }

    /// The number of expressions in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the expressions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Expression<V>> {
        self.0.iter()
    }
}

impl<V: AttributeValue> Default for Expressions<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: AttributeValue> PartialEq for Expressions<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V: AttributeValue> FromIterator<Expression<V>> for Expressions<V> {
    fn from_iter<I: IntoIterator<Item = Expression<V>>>(iter: I) -> Self {
        let mut expressions = Self::new();
        for expression in iter {
            expressions.append(expression);
        }
        expressions
    }
}

impl<V: AttributeValue> IntoIterator for Expressions<V> {
    type Item = Expression<V>;
    type IntoIter = std::vec::IntoIter<Expression<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V: AttributeValue> IntoIterator for &'a Expressions<V> {
    type Item = &'a Expression<V>;
    type IntoIter = std::slice::Iter<'a, Expression<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V: AttributeValue> fmt::Display for Expressions<V> {
    /// Renders a bracketed, comma-joined list, skipping empty expressions.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut first = true;
        for expression in &self.0 {
            if expression.steps.is_empty() {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}", expression)?;
            first = false;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_match_root() {
        let expression: Expression = Expression::match_root("name");
        assert!(expression.is_root());
        assert_eq!(expression.to_string(), "name");
        assert!(expression.matches(&Path::root("name")));
        assert!(!expression.matches(&Path::root("other")));
    }

    #[test]
    fn test_match_relative_matches_nothing_alone() {
        let expression: Expression = Expression::match_relative();
        assert!(!expression.is_root());
        assert!(!expression.matches(&Path::empty()));
        assert!(!expression.matches(&Path::root("a")));
    }

    #[test]
    fn test_default_expression_matches_nothing() {
        let expression: Expression = Expression::default();
        assert!(!expression.matches(&Path::empty()));
        assert!(!expression.matches(&Path::root("a").at_list_index(0)));
    }

    #[test]
    fn test_builders_do_not_mutate_receiver() {
        let base: Expression = Expression::match_root("network");
        let indexed = base.at_any_list_index();

        assert_eq!(base.to_string(), "network");
        assert_eq!(indexed.to_string(), "network[*]");
    }

    #[test]
    fn test_any_list_index_matching() {
        let expression: Expression = Expression::match_root("a").at_any_list_index();

        assert!(expression.matches(&Path::root("a").at_list_index(0)));
        assert!(expression.matches(&Path::root("a").at_list_index(5)));
        assert!(!expression.matches(&Path::root("a")));
        assert!(!expression.matches(&Path::root("b").at_list_index(0)));
    }

    #[test]
    fn test_exact_list_index_matching() {
        let expression: Expression = Expression::match_root("a").at_list_index(2);
        assert!(expression.matches(&Path::root("a").at_list_index(2)));
        assert!(!expression.matches(&Path::root("a").at_list_index(3)));
    }

    #[test]
    fn test_any_set_value_matching() {
        let expression: Expression = Expression::match_root("endpoints").at_any_set_value();
        assert!(expression.matches(&Path::root("endpoints").at_set_value(json!({"port": 80}))));
        assert!(!expression.matches(&Path::root("endpoints").at_list_index(0)));
    }

    #[test]
    fn test_exact_set_value_matching() {
        let expression = Expression::match_root("endpoints").at_set_value(json!({"port": 80}));
        assert!(expression.matches(&Path::root("endpoints").at_set_value(json!({"port": 80}))));
        assert!(!expression.matches(&Path::root("endpoints").at_set_value(json!({"port": 443}))));
    }

    #[test]
    fn test_parent_resolution() {
        let expression: Expression = Expression::match_root("a").at_name("b").at_parent();
        assert_eq!(
            expression.resolve().steps(),
            Expression::<serde_json::Value>::match_root("a").steps()
        );
        assert!(expression.matches(&Path::root("a")));
    }

    #[test]
    fn test_parent_overrun_resolves_to_empty() {
        let expression: Expression = Expression::match_relative().at_parent();
        assert!(expression.resolve().steps().is_empty());
        assert!(!expression.matches(&Path::empty()));
        assert!(!expression.matches(&Path::root("a")));
    }

    #[test]
    fn test_resolve_keeps_root_flag() {
        let expression: Expression = Expression::match_root("a").at_name("b").at_parent();
        assert!(expression.resolve().is_root());

        let relative: Expression = Expression::match_relative().at_name("b");
        assert!(!relative.resolve().is_root());
    }

    #[test]
    fn test_resolve_cleans_display() {
        let expression: Expression = Expression::match_root("a").at_name("b").at_parent();
        assert_eq!(expression.to_string(), "a.b.<");
        assert_eq!(expression.resolve().to_string(), "a");
    }

    #[test]
    fn test_matches_parent_requires_strict_prefix() {
        let expression: Expression = Expression::match_root("a").at_name("b");

        assert!(expression.matches_parent(&Path::root("a")));
        assert!(!expression.matches_parent(&Path::root("a").at_name("b")));
        assert!(!expression.matches_parent(&Path::root("x")));
    }

    #[test]
    fn test_merge_root_expression_wins() {
        let base: Expression = Expression::match_root("a").at_name("b");
        let other: Expression = Expression::match_root("c");

        let merged = base.merge(&other);
        assert_eq!(merged, other);
        assert_eq!(merged.to_string(), "c");
    }

    #[test]
    fn test_merge_relative_expression_appends() {
        let base: Expression = Expression::match_root("a");
        let other: Expression = Expression::match_relative().at_parent().at_name("b");

        let merged = base.merge(&other);
        assert!(merged.is_root());
        assert_eq!(
            merged.to_string(),
            format!("{}.{}", base, other)
        );
        assert!(merged.matches(&Path::root("b")));
    }

    #[test]
    fn test_merge_does_not_mutate_receiver() {
        let base: Expression = Expression::match_root("a");
        let _ = base.merge(&Expression::match_relative().at_name("b"));
        assert_eq!(base.to_string(), "a");
    }

    #[test]
    fn test_merge_expressions_empty_returns_self() {
        let base: Expression = Expression::match_root("a");
        let result = base.merge_expressions(&[]);

        assert_eq!(result.len(), 1);
        assert!(result.contains(&base));
    }

    #[test]
    fn test_merge_expressions_maps_merge() {
        let base: Expression = Expression::match_root("a");
        let others = [
            Expression::match_relative().at_name("b"),
            Expression::match_root("c"),
        ];

        let result = base.merge_expressions(&others);
        assert_eq!(result.len(), 2);
        assert!(result.contains(&base.at_name("b")));
        assert!(result.contains(&Expression::match_root("c")));
    }

    #[test]
    fn test_sibling_validator_scenario() {
        // A validator on "password" pointing at its sibling "username".
        let attribute: Expression = Expression::match_root("credentials").at_name("password");
        let sibling: Expression = Expression::match_relative().at_parent().at_name("username");

        let merged = attribute.merge(&sibling);
        assert!(merged.matches(&Path::root("credentials").at_name("username")));
        assert_eq!(merged.resolve().to_string(), "credentials.username");
    }

    #[test]
    fn test_equality_includes_root_flag() {
        let root: Expression = Expression::match_root("a");
        let relative: Expression = Expression::match_relative().at_name("a");

        assert_eq!(root.steps(), relative.steps());
        assert_ne!(root, relative);
    }

    #[test]
    fn test_from_path() {
        let path: Path = Path::root("tags").at_map_key("env");
        let expression = Expression::from(path.clone());

        assert!(expression.is_root());
        assert!(expression.matches(&path));
    }

    #[test]
    fn test_expressions_append_skips_duplicates() {
        let mut expressions: Expressions = Expressions::new();
        expressions.append(Expression::match_root("a"));
        expressions.append(Expression::match_root("b"));
        expressions.append(Expression::match_root("a"));

        assert_eq!(expressions.len(), 2);
    }

    #[test]
    fn test_expressions_matches_any_member() {
        let mut expressions: Expressions = Expressions::new();
        expressions.append(Expression::match_root("a"));
        expressions.append(Expression::match_root("tags").at_any_map_key());

        assert!(expressions.matches(&Path::root("a")));
        assert!(expressions.matches(&Path::root("tags").at_map_key("env")));
        assert!(!expressions.matches(&Path::root("b")));
    }

    #[test]
    fn test_expressions_display_skips_empty_entries() {
        let mut expressions: Expressions = Expressions::new();
        expressions.append(Expression::match_relative());
        expressions.append(Expression::match_root("a"));
        expressions.append(Expression::match_root("tags").at_any_map_key());

        assert_eq!(expressions.to_string(), "[a, tags[\"*\"]]");
    }

    #[test]
    fn test_tags_end_to_end_scenario() {
        let path: Path = Path::root("tags").at_map_key("env");
        let expression: Expression = Expression::match_root("tags").at_any_map_key();

        assert!(expression.matches(&path));
        assert_eq!(expression.to_string(), "tags[\"*\"]");
        assert_eq!(path.to_string(), "tags[\"env\"]");
    }

    #[test]
    fn test_expression_serde_round_trip() {
        let expression: Expression = Expression::match_root("tags").at_any_map_key().at_parent();
        let encoded = serde_json::to_string(&expression).unwrap();
        let decoded: Expression = serde_json::from_str(&encoded).unwrap();
        assert_eq!(expression, decoded);
    }
}
