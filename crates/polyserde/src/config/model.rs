use crate::packages::InstalledPackages;
use polyserde_core::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Root configuration from polyserde.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct PolyserdeConfig {
    /// Codec settings
    #[serde(default)]
    pub codec: CodecSection,

    /// Installed versions to report to the version guard, by library name.
    /// These take precedence over any other package lookup.
    #[serde(default)]
    pub packages: HashMap<String, String>,
}

impl PolyserdeConfig {
    pub fn installed_packages(&self) -> InstalledPackages {
        self.packages
            .iter()
            .map(|(lib, version)| (lib.as_str(), version.as_str()))
            .collect()
    }
}

/// [codec] section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CodecSection {
    /// Nesting limit for both encode and decode
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Indent artifacts written as text
    #[serde(default)]
    pub pretty: bool,
}

impl Default for CodecSection {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            pretty: false,
        }
    }
}

pub(crate) fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}
