//! TOML configuration for reconciliation and risk runs.
//!
//! ```toml
//! [recon]
//! lab_date_window_days = 3
//! aging_query_days = 45
//!
//! [risk]
//! high = 15
//! medium = 5
//! ```
//!
//! Every key is optional; command-line flags override file values.

use std::path::Path;

use anyhow::{Context, Result};
use recon_model::{ReconOptions, RiskThresholds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    pub recon: ReconOptions,
    /// Thresholds for the weighted risk ranking.
    pub risk: RiskThresholds,
}

impl ReconConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("parse configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read configuration {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("load configuration {}", path.display()))
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
    fn partial_file_keeps_defaults() {
        let config = ReconConfig::from_toml("[recon]\nlab_date_window_days = 5\n").unwrap();
        assert_eq!(config.recon.lab_date_window_days, 5);
        assert_eq!(config.recon.aging_query_days, 30.0);
        assert_eq!(config.risk, RiskThresholds::standard());
    }

    #[test]
    fn join_suffixes_are_configurable() {
        let config =
            ReconConfig::from_toml("[recon.join_suffixes]\nleft = \"_A\"\nright = \"_B\"\n").unwrap();
        assert_eq!(config.recon.join_suffixes.left, "_A");
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(ReconConfig::from_toml("[recon\n").is_err());
    }
}
