//! Polymorphic object-graph serialization core.
//!
//! Encodes a [`Value`] graph (records, enumeration members, class objects,
//! mappings with arbitrary keys, sequences, JSON primitives) into a
//! self-describing JSON tree, and decodes such a tree back into values of the
//! exact original types by resolving the dotted paths it carries.

pub mod codec;
pub mod error;
pub mod model;
pub mod naming;
pub mod resolver;
pub mod types;
pub mod value;

pub use codec::{Decoder, Encoder, DEFAULT_MAX_DEPTH, decode, encode};
pub use error::{DecodeError, EncodeError, ModelError, ResolutionError};
pub use model::{FieldDef, FieldKind, RecordModel, RecordSchema, SchemaModel};
pub use naming::DottedPath;
pub use resolver::TypeResolver;
pub use types::{Module, ModuleRegistry, ModuleSystem, TypeRef, TypeSpec, builtins};
pub use value::{EnumMember, Mapping, Opaque, Record, Value};
