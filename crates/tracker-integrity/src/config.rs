//! Integrity codec configuration.

use serde::{Deserialize, Serialize};

/// Settings for [`IntegrityCodec`](crate::IntegrityCodec).
///
/// The algorithm is kept as a plain string so a bad name only fails when the
/// codec is built, not when the configuration file is parsed. The date format
/// of the canonical form is fixed and cannot be configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrityConfig {
    /// Digest algorithm name (`sha256`, `sha384`, `sha512`).
    pub algorithm: String,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            algorithm: "sha256".to_string(),
        }
    }
}

impl IntegrityConfig {
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IntegrityConfig::default();
        assert_eq!(config.algorithm, "sha256");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: IntegrityConfig = toml::from_str("algorithm = \"sha512\"").unwrap();
        assert_eq!(config.algorithm, "sha512");
    }

    #[test]
    fn test_date_format_is_not_configurable() {
        let result = toml::from_str::<IntegrityConfig>("date_format = \"%Y-%m-%d %z\"");
        assert!(result.is_err());
    }
}
