//! Database configuration via `stratagraph.toml`
//!
//! On first open of a config directory a default `stratagraph.toml` is
//! created. To change settings, edit the file and reopen.

use serde::{Deserialize, Serialize};
use std::path::Path;
use stratagraph_core::{EntityType, GraphError, GraphResult};

/// Config file name placed in the database config directory.
pub const CONFIG_FILE_NAME: &str = "stratagraph.toml";

/// How newly created schema indexes come online.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPopulation {
    /// Indexes are online as soon as they are created (default)
    #[default]
    Immediate,
    /// Indexes stay `POPULATING` until population is completed or failed
    Deferred,
}

/// Automatic index settings for one entity kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutoIndexConfig {
    /// Maintain the automatic index
    #[serde(default)]
    pub enabled: bool,
    /// Property keys copied into the automatic index
    #[serde(default)]
    pub keys: Vec<String>,
}

impl AutoIndexConfig {
    /// Check whether writes to `key` are auto-indexed
    pub fn indexes_key(&self, key: &str) -> bool {
        self.enabled && self.keys.iter().any(|k| k == key)
    }
}

/// Database configuration loaded from `stratagraph.toml`.
///
/// # Example
///
/// ```toml
/// index_population = "immediate"
///
/// [node_auto_index]
/// enabled = true
/// keys = ["name"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Population mode for schema indexes.
    #[serde(default)]
    pub index_population: IndexPopulation,
    /// Automatic node index settings.
    #[serde(default)]
    pub node_auto_index: AutoIndexConfig,
    /// Automatic relationship index settings.
    #[serde(default)]
    pub relationship_auto_index: AutoIndexConfig,
}

impl GraphConfig {
    /// Automatic index settings for an entity kind
    pub fn auto_index(&self, entity: EntityType) -> &AutoIndexConfig {
        match entity {
            EntityType::Node => &self.node_auto_index,
            EntityType::Relationship => &self.relationship_auto_index,
        }
    }

    /// Enable the automatic node index for the given keys
    pub fn with_node_auto_index(mut self, keys: &[&str]) -> Self {
        self.node_auto_index = AutoIndexConfig {
            enabled: true,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        };
        self
    }

    /// Enable the automatic relationship index for the given keys
    pub fn with_relationship_auto_index(mut self, keys: &[&str]) -> Self {
        self.relationship_auto_index = AutoIndexConfig {
            enabled: true,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        };
        self
    }

    /// Set the schema index population mode
    pub fn with_index_population(mut self, population: IndexPopulation) -> Self {
        self.index_population = population;
        self
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# StrataGraph database configuration
#
# Schema index population: "immediate" (default) or "deferred"
#   "immediate" = new indexes are ONLINE as soon as they are created
#   "deferred"  = new indexes stay POPULATING until population completes
index_population = "immediate"

# Automatic node index (node_auto_index).
# Created on the first write of a listed property key.
[node_auto_index]
enabled = false
keys = []

# Automatic relationship index (relationship_auto_index).
[relationship_auto_index]
enabled = false
keys = []
"#
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GraphError::internal(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| {
            GraphError::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> GraphResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                GraphError::internal(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> GraphResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GraphError::internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            GraphError::internal(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
