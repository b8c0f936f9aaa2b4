//! Concrete attribute paths.
//!
//! A [`Path`] is an exact, wildcard-free traversal from the schema root to
//! one location: an attribute, a list element, a map element, or a set
//! element. Paths are immutable value objects; every builder method returns
//! a new path and leaves the receiver untouched, so a base path can be
//! shared freely between validators.
//!
//! # Example
//!
//! ```
//! use hemmer_attribute_path::Path;
//!
//! let path: Path = Path::root("network")
//!     .at_list_index(0)
//!     .at_name("subnet")
//!     .at_map_key("internal");
//!
//! assert_eq!(path.to_string(), "network[0].subnet[\"internal\"]");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression::Expression;
use crate::step::{PathStep, PathSteps};
use crate::value::AttributeValue;

/// A concrete path to one exact location within a schema.
///
/// The empty path denotes the schema root itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>")
)]
pub struct Path<V: AttributeValue = serde_json::Value> {
    steps: PathSteps<V>,
}

impl<V: AttributeValue> Path<V> {
    /// Create a path pointing at the root-level attribute with the given
    /// name.
    pub fn root(name: impl Into<String>) -> Self {
        let mut steps = PathSteps::new();
        steps.append(PathStep::AttributeName(name.into()));
        Self { steps }
    }

    /// Create a path with no steps, denoting the schema root itself.
    pub fn empty() -> Self {
        Self {
            steps: PathSteps::new(),
        }
    }

    /// Return a new path with an attribute-name step appended.
    pub fn at_name(&self, name: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.steps.append(PathStep::AttributeName(name.into()));
        path
    }

    /// Return a new path with a list-index step appended.
    pub fn at_list_index(&self, index: i64) -> Self {
        let mut path = self.clone();
        path.steps.append(PathStep::ElementKeyInt(index));
        path
    }

    /// Return a new path with a map-key step appended.
    pub fn at_map_key(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.steps.append(PathStep::ElementKeyString(key.into()));
        path
    }

    /// Return a new path with a set-value step appended.
    pub fn at_set_value(&self, value: V) -> Self {
        let mut path = self.clone();
        path.steps.append(PathStep::ElementKeyValue(value));
        path
    }

    /// Return a new path with the last step removed.
    ///
    /// The parent of the empty path is the empty path; this never errors.
    pub fn parent_path(&self) -> Self {
        match self.steps.last_step() {
            Some((leading, _)) => Self { steps: leading },
            None => Self::empty(),
        }
    }

    /// Convert this path into the root-anchored expression that matches
    /// exactly this path.
    pub fn expression(&self) -> Expression<V> {
        Expression::root_from_steps(self.steps.expression_steps())
    }

    /// The steps of this path, as a defensive copy.
    pub fn steps(&self) -> PathSteps<V> {
        self.steps.clone()
    }

    pub(crate) fn steps_ref(&self) -> &PathSteps<V> {
        &self.steps
    }
}

impl<V: AttributeValue> Default for Path<V> {
    /// The empty path, denoting the schema root.
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: AttributeValue> PartialEq for Path<V> {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl<V: AttributeValue> fmt::Display for Path<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.steps)
    }
}

/// An ordered collection of paths without duplicates.
///
/// [`append`](Self::append) skips a path when an equal one is already
/// present, so validators can accumulate paths without producing duplicate
/// diagnostics.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    transparent,
    bound(serialize = "V: Serialize", deserialize = "V: Deserialize<'de>")
)]
pub struct Paths<V: AttributeValue = serde_json::Value>(Vec<Path<V>>);

impl<V: AttributeValue> Paths<V> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a path to the collection unless an equal path is already present.
    pub fn append(&mut self, path: Path<V>) {
        if !self.contains(&path) {
            self.0.push(path);
        }
    }

    /// Whether the collection contains a path equal to the given one.
    pub fn contains(&self, path: &Path<V>) -> bool {
        self.0.iter().any(|candidate| candidate == path)
    }

    /// The number of paths in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the paths in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Path<V>> {
        self.0.iter()
    }
}

impl<V: AttributeValue> Default for Paths<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: AttributeValue> PartialEq for Paths<V> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<V: AttributeValue> FromIterator<Path<V>> for Paths<V> {
    fn from_iter<I: IntoIterator<Item = Path<V>>>(iter: I) -> Self {
        let mut paths = Self::new();
        for path in iter {
            paths.append(path);
        }
        paths
    }
}

impl<V: AttributeValue> IntoIterator for Paths<V> {
    type Item = Path<V>;
    type IntoIter = std::vec::IntoIter<Path<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, V: AttributeValue> IntoIterator for &'a Paths<V> {
    type Item = &'a Path<V>;
    type IntoIter = std::slice::Iter<'a, Path<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<V: AttributeValue> fmt::Display for Paths<V> {
    /// Renders a bracketed, comma-joined list, skipping empty paths.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        let mut first = true;
        for path in &self.0 {
            if path.steps_ref().is_empty() {
                continue;
            }
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}", path)?;
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
    fn test_root_and_empty() {
        let root: Path = Path::root("name");
        assert_eq!(root.to_string(), "name");
        assert_eq!(root.steps().len(), 1);

        let empty: Path = Path::empty();
        assert_eq!(empty.to_string(), "");
        assert!(empty.steps().is_empty());
        assert_eq!(empty, Path::default());
    }

    #[test]
    fn test_builders_append_one_step() {
        let path: Path = Path::root("network")
            .at_list_index(0)
            .at_name("subnet")
            .at_map_key("internal")
            .at_set_value(json!({"cidr": "10.0.0.0/24"}));

        assert_eq!(path.steps().len(), 5);
        assert_eq!(
            path.to_string(),
            "network[0].subnet[\"internal\"][Value({\"cidr\":\"10.0.0.0/24\"})]"
        );
    }

    #[test]
    fn test_builders_do_not_mutate_receiver() {
        let base: Path = Path::root("tags");
        let env = base.at_map_key("env");
        let region = base.at_map_key("region");

        assert_eq!(base.to_string(), "tags");
        assert_eq!(env.to_string(), "tags[\"env\"]");
        assert_eq!(region.to_string(), "tags[\"region\"]");
    }

    #[test]
    fn test_parent_path() {
        let path: Path = Path::root("a").at_name("b");
        assert_eq!(path.parent_path(), Path::root("a"));
        assert_eq!(path.parent_path().parent_path(), Path::empty());

        // The parent of the empty path stays empty.
        assert_eq!(Path::<serde_json::Value>::empty().parent_path(), Path::empty());
    }

    #[test]
    fn test_expression_round_trip() {
        let path: Path = Path::root("network")
            .at_list_index(1)
            .at_name("cidr");
        let expression = path.expression();

        assert!(expression.matches(&path));
        assert_eq!(expression.to_string(), path.to_string());
    }

    #[test]
    fn test_expression_round_trip_with_set_value() {
        let path: Path = Path::root("endpoints").at_set_value(json!({"port": 80}));
        assert!(path.expression().matches(&path));
    }

    #[test]
    fn test_equality() {
        let a: Path = Path::root("a").at_list_index(0);
        let b: Path = Path::root("a").at_list_index(0);
        let c: Path = Path::root("a").at_list_index(1);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Path::root("a"));
    }

    #[test]
    fn test_steps_is_a_defensive_copy() {
        let path: Path = Path::root("a");
        let mut steps = path.steps();
        steps.append(PathStep::AttributeName("b".to_string()));

        assert_eq!(path.steps().len(), 1);
    }

    #[test]
    fn test_paths_append_skips_duplicates() {
        let mut paths: Paths = Paths::new();
        paths.append(Path::root("a"));
        paths.append(Path::root("b"));
        paths.append(Path::root("a"));

        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&Path::root("a")));
        assert!(paths.contains(&Path::root("b")));
        assert!(!paths.contains(&Path::root("c")));
    }

    #[test]
    fn test_paths_display_skips_empty_entries() {
        let mut paths: Paths = Paths::new();
        paths.append(Path::empty());
        paths.append(Path::root("a"));
        paths.append(Path::root("tags").at_map_key("env"));

        assert_eq!(paths.to_string(), "[a, tags[\"env\"]]");
    }

    #[test]
    fn test_paths_from_iterator_dedups() {
        let paths: Paths = [Path::root("a"), Path::root("a"), Path::root("b")]
            .into_iter()
            .collect();
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn test_path_serde_round_trip() {
        let path: Path = Path::root("tags").at_map_key("env").at_list_index(2);
        let encoded = serde_json::to_string(&path).unwrap();
        let decoded: Path = serde_json::from_str(&encoded).unwrap();
        assert_eq!(path, decoded);
    }
}
