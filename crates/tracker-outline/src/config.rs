//! Outline engine configuration.

use serde::{Deserialize, Serialize};

/// Limits applied by the outline engine and its session pump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Deepest ancestor chain a path lookup will walk.
    pub max_depth: usize,
    /// Event rounds handled by one session pump before leftovers are
    /// deferred to the next pump.
    pub max_pump_rounds: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_pump_rounds: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OutlineConfig::default();
        assert_eq!(config.max_depth, 256);
        assert_eq!(config.max_pump_rounds, 8);
    }

    #[test]
    fn test_partial_toml() {
        let config: OutlineConfig = toml::from_str("max_pump_rounds = 2").unwrap();
        assert_eq!(config.max_pump_rounds, 2);
        assert_eq!(config.max_depth, 256);
    }
}
