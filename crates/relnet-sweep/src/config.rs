//! Network cost tables and built-in presets.

use relnet_design::{Catalog, DesignError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Names accepted by [`NetworkConfig::preset`].
pub const PRESETS: [&str; 2] = ["evaluation-2025", "evaluation-2030"];

const PRESET_RELIABILITIES: [f64; 3] = [0.9, 0.95, 0.99];

/// Cost and reliability per node type plus the cost of one link.
///
/// Type indices are map keys so a JSON file reads
/// `{"cost_by_node_type": {"0": 24.2, ...}, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub cost_by_node_type: BTreeMap<usize, f64>,
    pub reliability_by_node_type: BTreeMap<usize, f64>,
    pub link_cost: f64,
}

#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io { path: String, message: String },
    /// The configuration file is not valid JSON for a [`NetworkConfig`]
    Parse { path: String, message: String },
    /// No preset with this name
    UnknownPreset { name: String },
    /// Tables do not form a valid catalog
    Design(DesignError),
}

impl ConfigError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO",
            ConfigError::Parse { .. } => "CONFIG_PARSE",
            ConfigError::UnknownPreset { .. } => "CONFIG_UNKNOWN_PRESET",
            ConfigError::Design(inner) => inner.code(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "[{}] Cannot read {}: {}", self.code(), path, message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "[{}] Cannot parse {}: {}", self.code(), path, message)
            }
            ConfigError::UnknownPreset { name } => write!(
                f,
                "[{}] Unknown preset '{}' (expected one of: {})",
                self.code(),
                name,
                PRESETS.join(", ")
            ),
            ConfigError::Design(inner) => write!(f, "{inner}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Design(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<DesignError> for ConfigError {
    fn from(err: DesignError) -> Self {
        ConfigError::Design(err)
    }
}

impl NetworkConfig {
    /// Build a config from type-ordered tables.
    pub fn from_slices(costs: &[f64], reliabilities: &[f64], link_cost: f64) -> Self {
        Self {
            cost_by_node_type: costs.iter().copied().enumerate().collect(),
            reliability_by_node_type: reliabilities.iter().copied().enumerate().collect(),
            link_cost,
        }
    }

    /// Built-in cost scenarios.
    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        let (costs, link_cost) = match name {
            "evaluation-2025" => ([24.2, 91.82, 227.06], 7.69),
            "evaluation-2030" => ([10.74, 40.74, 100.75], 3.41),
            _ => {
                return Err(ConfigError::UnknownPreset {
                    name: name.to_string(),
                });
            }
        };
        Ok(Self::from_slices(&costs, &PRESET_RELIABILITIES, link_cost))
    }

    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: display.clone(),
            message: err.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|err| ConfigError::Parse {
            path: display,
            message: err.to_string(),
        })
    }

    /// Validated catalog of the node tables.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        Ok(Catalog::from_tables(
            &self.cost_by_node_type,
            &self.reliability_by_node_type,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_presets_share_reliabilities() {
        for name in PRESETS {
            let config = NetworkConfig::preset(name).unwrap();
            let catalog = config.catalog().unwrap();
            assert_eq!(catalog.reliabilities(), vec![0.9, 0.95, 0.99]);
        }
        let config = NetworkConfig::preset("evaluation-2030").unwrap();
        assert_eq!(config.link_cost, 3.41);
        assert_eq!(config.cost_by_node_type[&2], 100.75);
    }

    #[test]
    fn test_unknown_preset() {
        let err = NetworkConfig::preset("evaluation-2040").unwrap_err();
        assert_eq!(err.code(), "CONFIG_UNKNOWN_PRESET");
        assert!(err.to_string().contains("evaluation-2025"));
    }

    #[test]
    fn test_catalog_errors_keep_design_code() {
        let config = NetworkConfig::from_slices(&[1.0, 2.0], &[0.5], 1.0);
        assert_eq!(config.catalog().unwrap_err().code(), "INPUT_CATALOG");
    }
}
