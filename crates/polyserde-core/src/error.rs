//! Error types for encoding, decoding, and type resolution.
//!
//! Each stage has its own error enum so callers can tell an encode-time
//! rejection from a decode-time reconstruction failure without string matching.

use thiserror::Error;

/// A dotted path did not lead to an importable module or a known attribute.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("invalid dotted path: '{0}'")]
    InvalidPath(String),

    #[error("no importable module for path '{0}'")]
    ModuleNotFound(String),

    #[error("module '{module}' has no attribute '{attribute}'")]
    AttributeNotFound { module: String, attribute: String },
}

/// Failures raised by the record model while validating or constructing an instance.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("{ty}: missing required field '{field}'")]
    MissingField { ty: String, field: String },

    #[error("{ty}: unknown field '{field}'")]
    UnknownField { ty: String, field: String },

    #[error("{ty}: field '{field}' expected {expected}, found {found}")]
    InvalidField {
        ty: String,
        field: String,
        expected: String,
        found: String,
    },

    #[error("'{0}' is not a record type")]
    NotARecordType(String),
}

/// Encode-time failures. Nothing is emitted when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// The value is outside the supported set (opaque handles, non-finite floats).
    #[error("unsupported value of type '{type_name}' at {location}")]
    UnsupportedType { type_name: String, location: String },

    #[error("maximum nesting depth of {max_depth} exceeded at {location}")]
    DepthLimitExceeded { max_depth: usize, location: String },
}

/// Decode-time failures; every variant aborts reconstruction of the whole tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("cannot resolve type at {location}: {source}")]
    Unresolved {
        location: String,
        #[source]
        source: ResolutionError,
    },

    #[error("cannot construct record at {location}: {source}")]
    Model {
        location: String,
        #[source]
        source: ModelError,
    },

    #[error("cannot reconstruct value at {location}: {reason}")]
    Reconstruction { location: String, reason: String },

    #[error("maximum nesting depth of {max_depth} exceeded at {location}")]
    DepthLimitExceeded { max_depth: usize, location: String },
}

impl DecodeError {
    /// Location in the tagged tree where decoding failed, e.g. `$.animals[0]`.
    pub fn location(&self) -> &str {
        match self {
            DecodeError::Unresolved { location, .. }
            | DecodeError::Model { location, .. }
            | DecodeError::Reconstruction { location, .. }
            | DecodeError::DepthLimitExceeded { location, .. } => location,
        }
    }
}
