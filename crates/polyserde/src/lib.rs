//! Versioned artifacts for polymorphic object graphs.
//!
//! [`Polyserde::dump`] encodes a [`Value`] with the tagged codec from
//! `polyserde-core` and records the library name and version it was produced
//! with. [`Polyserde::load`] reconstructs the value and compares the recorded
//! version against the installed one, returning a [`VersionWarning`] instead of
//! failing when they differ.
//!
//! A [`Polyserde`] built with [`Polyserde::new`] knows no installed libraries,
//! so no version warning is ever raised. Supply a [`PackageMetadata`] source
//! through [`Polyserde::with_packages`], or package versions through
//! [`Polyserde::with_config`], to turn the check on.

pub mod artifact;
pub mod config;
pub mod error;
pub mod packages;
pub mod version;

pub use artifact::{DATA_KEY, LIB_KEY, Loaded, Polyserde, VERSION_KEY};
pub use config::{CodecSection, PolyserdeConfig};
pub use error::{Error, Result};
pub use packages::{InstalledPackages, PackageLookup, PackageMetadata};
pub use version::{Compatibility, ParseVersionError, Severity, Version, VersionGuard, VersionWarning, compare};

pub use polyserde_core::{
    DecodeError, EncodeError, FieldDef, FieldKind, Mapping, ModelError, Module, ModuleRegistry, ModuleSystem,
    RecordModel, ResolutionError, TypeRef, TypeSpec, Value,
};
