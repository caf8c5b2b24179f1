//! Tagged JSON codec.
//!
//! Values plain JSON cannot express are written as objects carrying one of the
//! reserved keys below:
//!
//! - `{"__class__": "mod.Person", "name": "Alice", "age": 30}`
//! - `{"__enum__": "mod.Color.RED"}`
//! - `{"__class_ref__": "builtins.dict"}`
//! - `{"__dict__": [{"__key__": 1, "value": "a"}]}`
//!
//! The decoder checks the reserved keys in that order; the first one present
//! decides how the node is read.

mod decode;
mod encode;
mod trail;

pub use decode::Decoder;
pub use encode::Encoder;

use crate::error::{DecodeError, EncodeError};
use crate::types::ModuleSystem;
use crate::value::Value;

pub const CLASS_TAG: &str = "__class__";
pub const ENUM_TAG: &str = "__enum__";
pub const CLASS_REF_TAG: &str = "__class_ref__";
pub const DICT_TAG: &str = "__dict__";

/// Key of an entry inside a `__dict__` sequence.
pub const KEY_TAG: &str = "__key__";
/// Value of an entry inside a `__dict__` sequence.
pub const VALUE_KEY: &str = "value";

/// Reserved keys in decode precedence order.
pub const RESERVED_KEYS: [&str; 4] = [CLASS_TAG, ENUM_TAG, CLASS_REF_TAG, DICT_TAG];

/// Default bound on nesting depth for both directions.
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// Encode with the default schema model and depth limit.
pub fn encode(value: &Value) -> Result<serde_json::Value, EncodeError> {
    Encoder::new().encode(value)
}

/// Decode with the default schema model and depth limit, resolving types in `modules`.
pub fn decode<S: ModuleSystem>(tree: &serde_json::Value, modules: S) -> Result<Value, DecodeError> {
    Decoder::new(modules).decode(tree)
}
