//! Runtime type validation for component arguments.
//!
//! - [`descriptor`]: the descriptor algebra (primitives, `array_of`, `one_of`,
//!   `optional`, `shape_of`, `union_of`, class instances) and its JSON form.
//! - [`matcher`]: `matches(value, descriptor)` with a path to the first
//!   offending sub-value.
//! - [`args`]: unexpected/missing argument names under a whitelist policy.
//! - [`diagnostic`]: messages for all of the above.
//! - [`signature`]: per-owner argument tables and the caller-side hooks.
//!
//! ```
//! use arg_types::descriptor::{array_of, one_of, shape_of};
//! use arg_types::matcher::matches;
//! use arg_types::value::Value;
//!
//! let d = array_of(shape_of([("x", array_of(one_of(["a", "b"])))]));
//! let v = Value::from(serde_json::json!([{"x": []}, {"x": ["a"]}, {"x": ["z"]}]));
//! assert_eq!(matches(&v, &d).unwrap_err().path.to_string(), "[2].x[0]");
//! ```
pub mod args;
pub mod config;
pub mod descriptor;
pub mod diagnostic;
pub mod error;
pub mod matcher;
pub mod path_de;
pub mod signature;
pub mod value;

pub use descriptor::Descriptor;
pub use error::{ConfigError, DescriptorError, ValidationError};
pub use matcher::{MatchResult, Mismatch, matches};
pub use signature::Signature;
pub use value::Value;
