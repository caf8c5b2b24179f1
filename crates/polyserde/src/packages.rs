//! Installed package metadata.
//!
//! The version guard asks a [`PackageMetadata`] for the installed version of the
//! library named in an artifact. Lookups are read-only and never touch the
//! network.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Read-only lookup of installed library versions.
pub trait PackageMetadata: Send + Sync {
    /// Installed version of `lib`, or `None` when it is not installed.
    fn installed_version(&self, lib: &str) -> Option<String>;
}

impl<F> PackageMetadata for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn installed_version(&self, lib: &str) -> Option<String> {
        self(lib)
    }
}

/// Fixed table of installed versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackages {
    versions: HashMap<String, String>,
}

impl InstalledPackages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, lib: impl Into<String>, version: impl Into<String>) -> Self {
        self.insert(lib, version);
        self
    }

    /// Record `version` for `lib`, returning the version it replaces.
    pub fn insert(&mut self, lib: impl Into<String>, version: impl Into<String>) -> Option<String> {
        self.versions.insert(lib.into(), version.into())
    }

    pub fn get(&self, lib: &str) -> Option<&str> {
        self.versions.get(lib).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl PackageMetadata for InstalledPackages {
    fn installed_version(&self, lib: &str) -> Option<String> {
        self.get(lib).map(str::to_string)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InstalledPackages {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            versions: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Ordered stack of lookups; the first one that knows a library answers.
#[derive(Clone, Default)]
pub struct PackageLookup {
    layers: Vec<Arc<dyn PackageMetadata>>,
}

impl PackageLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `layer` after every layer already added.
    pub fn then(mut self, layer: impl PackageMetadata + 'static) -> Self {
        self.layers.push(Arc::new(layer));
        self
    }

    pub(crate) fn then_shared(mut self, layer: Arc<dyn PackageMetadata>) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl PackageMetadata for PackageLookup {
    fn installed_version(&self, lib: &str) -> Option<String> {
        self.layers
            .iter()
            .find_map(|layer| layer.installed_version(lib))
    }
}

impl fmt::Debug for PackageLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackageLookup")
            .field("layers", &self.layers.len())
            .finish()
    }
}
