//! Startup configuration
//!
//! ```yaml
//! ai:
//!   configured: true
//!   request_timeout_secs: 60
//! catalog:
//!   - id: value-propositions
//!     title: Értékajánlat
//! ```
//!
//! Both sections are optional. A missing catalog means the default
//! Business Model Canvas.

use crate::ai::AiGate;
use crate::canvas::{BlockCatalog, BlockSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("duplicate block id in catalog: {0}")]
    DuplicateBlockId(String),
}

/// AI availability, read once at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiSettings {
    #[serde(default)]
    pub configured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl AiSettings {
    pub fn gate(&self) -> AiGate {
        let gate = if self.configured {
            AiGate::configured()
        } else {
            AiGate::unconfigured()
        };
        match self.request_timeout_secs {
            Some(secs) => gate.with_timeout(Duration::from_secs(secs)),
            None => gate,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    #[serde(default)]
    pub ai: AiSettings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catalog: Vec<BlockSpec>,
}

impl CanvasConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(yaml) => Self::from_yaml(&yaml),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for block in &self.catalog {
            if !seen.insert(block.id.as_str()) {
                return Err(ConfigError::DuplicateBlockId(block.id.clone()));
            }
        }
        Ok(())
    }

    pub fn block_catalog(&self) -> BlockCatalog {
        if self.catalog.is_empty() {
            BlockCatalog::default()
        } else {
            BlockCatalog::new(self.catalog.clone())
        }
    }

    pub fn gate(&self) -> AiGate {
        self.ai.gate()
    }
}

/// Default config location (~/.config/bmcanvas/config.yaml)
pub fn default_config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"));
    config_dir.join("bmcanvas").join("config.yaml")
}
