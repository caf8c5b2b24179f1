//! Configuration module
//!
//! Handles loading and parsing of polyserde configuration files (polyserde.toml, polyserde.json).

pub mod model;

use std::path::Path;

pub use self::model::*;

impl PolyserdeConfig {
    /// Load configuration from a file path
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        // Detect format based on extension
        if path.extension().is_some_and(|ext| ext == "json") {
            return Ok(serde_json::from_str(&content)?);
        }

        // Default to TOML
        let config: PolyserdeConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
