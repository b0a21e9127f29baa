//! TOML configuration file for the `tracker` binary.
//!
//! ```toml
//! [integrity]
//! algorithm = "sha256"
//!
//! [outline]
//! max_depth = 64
//!
//! [authors]
//! authors = ["alice", "bob"]
//! selected = ["alice"]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracker_authors::AuthorSettings;
use tracker_integrity::IntegrityConfig;
use tracker_outline::OutlineConfig;

/// Every section is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub integrity: IntegrityConfig,
    pub outline: OutlineConfig,
    pub authors: AuthorSettings,
}

impl TrackerConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse tracker configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config =
            Self::from_toml(&text).with_context(|| format!("load config {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(TrackerConfig::from_toml("").unwrap(), TrackerConfig::default());
    }

    #[test]
    fn test_sections() {
        let config = TrackerConfig::from_toml(
            r#"
            [integrity]
            algorithm = "sha512"

            [outline]
            max_pump_rounds = 2

            [authors]
            selected = ["alice"]
            "#,
        )
        .unwrap();
        assert_eq!(config.integrity.algorithm, "sha512");
        assert_eq!(config.outline.max_pump_rounds, 2);
        assert_eq!(config.outline.max_depth, OutlineConfig::default().max_depth);
        assert_eq!(config.authors.selected, vec!["alice"]);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(TrackerConfig::from_toml("[outline]\nmax_depth = \"deep\"").is_err());
    }
}
