//! The value capability required of set-element steps.
//!
//! Set elements have no stable index or key; they are identified by the
//! element value itself. The path engine therefore needs two things from a
//! value type: a way to compare two elements, and a way to render one for
//! diagnostics. This module expresses that as the [`AttributeValue`] trait
//! rather than tying the engine to any particular schema value system.
//!
//! The default value type throughout the crate is [`serde_json::Value`],
//! which is how `hemmer-provider-sdk` represents resource state.

use std::fmt;

/// Capability contract for values stored in set-element steps.
///
/// Equality is delegated to the value's own semantics; the path engine never
/// compares set elements structurally itself.
pub trait AttributeValue: Clone + fmt::Debug {
    /// Whether `self` and `other` are semantically equal.
    fn equal(&self, other: &Self) -> bool;

    /// Render the value for use in diagnostic messages.
    ///
    /// The rendering appears inside the `[Value(...)]` form of a set-value
    /// step, e.g. `[Value("gateway")]`.
    fn render(&self) -> String;
}

impl AttributeValue for serde_json::Value {
    fn equal(&self, other: &Self) -> bool {
        self == other
    }

    fn render(&self) -> String {
        self.to_string()
    }
}
