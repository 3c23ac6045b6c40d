//! Configuration for the FACTZ cell system.
//!
//! Maps directly to `factz.toml`. Every field is optional in the file;
//! omitted fields fall back to the defaults the cells themselves use.

use serde::{Deserialize, Serialize};

/// Top-level FACTZ configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactzConfig {
    /// Temporal tuning shared by the cell variants.
    #[serde(default)]
    pub cells: CellConfig,
    /// Telemetry & observability.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl FactzConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`FactzError::Config`](crate::FactzError::Config) if the TOML
    /// is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::FactzError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Temporal tuning for value cells.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CellConfig {
    /// Seconds between forced recomputations of a computed cell.
    /// Values below 2 disable caching entirely.
    #[serde(default = "default_check_interval")]
    pub check_interval: u32,
    /// Minimum seconds before a tracked cell may recognize a new change.
    #[serde(default = "default_min_change_interval")]
    pub min_change_interval: u32,
    /// Maximum `(value, timestamp)` entries a history cell retains.
    #[serde(default = "default_log_length")]
    pub log_length: usize,
}

impl Default for CellConfig {
    fn default() -> Self {
        Self {
            check_interval: default_check_interval(),
            min_change_interval: default_min_change_interval(),
            log_length: default_log_length(),
        }
    }
}

/// Telemetry & observability settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether owning agents should attach a computation probe.
    #[serde(default = "default_true")]
    pub probe: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            probe: default_true(),
        }
    }
}

fn default_check_interval() -> u32 {
    1
}

fn default_min_change_interval() -> u32 {
    0
}

fn default_log_length() -> usize {
    10
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = FactzConfig::from_toml("").expect("empty config should parse");
        assert_eq!(config.cells.check_interval, 1);
        assert_eq!(config.cells.min_change_interval, 0);
        assert_eq!(config.cells.log_length, 10);
        assert!(config.telemetry.probe);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = FactzConfig::from_toml(
            r#"
            [cells]
            check_interval = 20
            "#,
        )
        .expect("config should parse");
        assert_eq!(config.cells.check_interval, 20);
        assert_eq!(config.cells.log_length, 10);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = FactzConfig::from_toml("cells = 3").expect_err("should reject");
        assert!(matches!(err, crate::FactzError::Config(_)));
    }
}
