//! # Pool Configuration
//!
//! Pool sizing loaded once at startup from TOML.
//!
//! ```toml
//! label = "particles"
//! initial_capacity = 4096
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Label used when none is configured.
pub const DEFAULT_LABEL: &str = "pool";

/// Slot count of the first block when none is configured.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Configuration for a [`PoolAllocator`](crate::PoolAllocator).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Name attached to every log line emitted by the pool.
    pub label: String,
    /// Slot count of the first block. Zero leaves the pool unsized.
    pub initial_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_owned(),
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

impl PoolConfig {
    /// Creates a configuration with the given label and first block size.
    #[must_use]
    pub fn new(label: impl Into<String>, initial_capacity: usize) -> Self {
        Self {
            label: label.into(),
            initial_capacity,
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the text is not valid TOML
    /// or contains unknown keys.
    pub fn from_toml_str(text: &str) -> PoolResult<Self> {
        toml::from_str(text).map_err(|e| PoolError::InvalidConfig(e.to_string()))
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: impl AsRef<Path>) -> PoolResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| PoolError::InvalidConfig(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_for_missing_keys() {
        let config = PoolConfig::from_toml_str("").unwrap();
        assert_eq!(config, PoolConfig::default());

        let config = PoolConfig::from_toml_str("initial_capacity = 16").unwrap();
        assert_eq!(config.label, DEFAULT_LABEL);
        assert_eq!(config.initial_capacity, 16);
    }

    #[test]
    fn test_config_full() {
        let config =
            PoolConfig::from_toml_str("label = \"particles\"\ninitial_capacity = 4096\n").unwrap();
        assert_eq!(config, PoolConfig::new("particles", 4096));
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let err = PoolConfig::from_toml_str("initial_capacty = 16").unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_rejects_wrong_type() {
        let err = PoolConfig::from_toml_str("initial_capacity = \"lots\"").unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_missing_file() {
        let path = std::env::temp_dir().join("poolchain_config_does_not_exist.toml");
        let err = PoolConfig::from_toml_file(&path).unwrap_err();
        assert!(matches!(err, PoolError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_from_file() {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("poolchain_config_{id}.toml"));
        std::fs::write(&path, "label = \"packets\"\ninitial_capacity = 8\n").unwrap();

        let config = PoolConfig::from_toml_file(&path).unwrap();
        assert_eq!(config, PoolConfig::new("packets", 8));

        std::fs::remove_file(&path).ok();
    }
}
