//! Hemmer Attribute Path
//!
//! This crate provides attribute path addressing for Hemmer provider
//! schemas: a way to point at one exact location within a nested schema of
//! objects, lists, maps, and sets, and a way to describe patterns over such
//! locations. It is the addressing layer used by schema validation and
//! diagnostic formatting in providers built on
//! [hemmer-provider-sdk](https://github.com/hemmer-io/hemmer-provider-sdk).
//!
//! # Overview
//!
//! The crate provides two core value types:
//!
//! - **[`Path`]**: a concrete, wildcard-free traversal from the schema root
//!   to one exact location, e.g. `network[0].subnet["internal"]`
//! - **[`Expression`]**: a pattern over traversals, with wildcard steps and
//!   parent-relative steps, e.g. `network[*].cidr`
//!
//! Both are immutable value objects: every builder method copies the
//! receiver and appends one step, so a base path can be shared freely.
//! Nothing in this crate returns an error; malformed combinations (such as
//! stepping above the schema root) degrade to expressions that match
//! nothing.
//!
//! # Quick Start
//!
//! ```
//! use hemmer_attribute_path::{Expression, Path};
//!
//! // A concrete location within the schema.
//! let path: Path = Path::root("network").at_list_index(0).at_name("cidr");
//! assert_eq!(path.to_string(), "network[0].cidr");
//!
//! // A pattern matching that location in every list element.
//! let expression: Expression = Expression::match_root("network")
//!     .at_any_list_index()
//!     .at_name("cidr");
//!
//! assert!(expression.matches(&path));
//! assert!(expression.matches(&Path::root("network").at_list_index(7).at_name("cidr")));
//! assert!(!expression.matches(&Path::root("network")));
//! ```
//!
//! # Relative Expressions
//!
//! A validator declared on one attribute can point at another without
//! knowing where it lives in the schema. It exports a relative fragment,
//! and the framework merges it onto the attribute's own expression:
//!
//! ```
//! use hemmer_attribute_path::{Expression, Path};
//!
//! // Declared on "password"; points at the sibling "username".
//! let fragment: Expression = Expression::match_relative().at_parent().at_name("username");
//!
//! let password: Expression = Expression::match_root("credentials").at_name("password");
//! let username = password.merge(&fragment);
//!
//! assert!(username.matches(&Path::root("credentials").at_name("username")));
//! ```
//!
//! # Set Elements
//!
//! Set elements have no index or key; they are identified by value. The
//! [`AttributeValue`] trait captures what the engine needs from a value
//! type (its own equality and a diagnostic rendering). The default value
//! type is [`serde_json::Value`], matching how the SDK represents resource
//! state.
//!
//! # Logging
//!
//! Match outcomes are emitted as `tracing` events at trace level. Enable
//! them with `RUST_LOG=hemmer_attribute_path=trace` when debugging
//! validator path wiring; no subscriber is installed by this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod expression;
pub mod expression_step;
pub mod path;
pub mod step;
pub mod value;

// Re-export main types at crate root
pub use expression::{Expression, Expressions};
pub use expression_step::{ExpressionStep, ExpressionSteps};
pub use path::{Path, Paths};
pub use step::{PathStep, PathSteps};
pub use value::AttributeValue;

// Re-export commonly used external types
pub use serde_json;
