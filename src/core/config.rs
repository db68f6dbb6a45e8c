//! Manager configuration from YAML

use crate::core::options::BirbOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Top-level configuration for an event manager
///
/// ```yaml
/// defaults:
///   lifetime: SINGLE
/// contexts:
///   - identifier: main
/// procedures:
///   counter:
///     lifetime: DURABLE
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Options used for procedures with no entry in `procedures`
    #[serde(default)]
    pub defaults: BirbOptions,

    /// Contexts to create, in order
    #[serde(default)]
    pub contexts: Vec<ContextConfig>,

    /// Per-procedure option overrides, keyed by procedure name
    #[serde(default)]
    pub procedures: HashMap<String, BirbOptions>,
}

/// Context configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Unique context identifier
    pub identifier: String,
}

impl ManagerConfig {
    /// Load manager configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse manager configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ManagerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the manager configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for context in &self.contexts {
            if context.identifier.trim().is_empty() {
                anyhow::bail!("Context identifier cannot be empty");
            }
            if !seen.insert(&context.identifier) {
                anyhow::bail!("Duplicate context identifier: {}", context.identifier);
            }
        }

        if self.procedures.keys().any(|name| name.trim().is_empty()) {
            anyhow::bail!("Procedure name cannot be empty");
        }

        Ok(())
    }

    /// Options for a procedure, falling back to the configured defaults
    pub fn options_for(&self, name: &str) -> BirbOptions {
        self.procedures
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.defaults.clone())
    }
}
