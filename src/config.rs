//! Panel design configuration
//!
//! Loaded from TOML. Every field has a default, so a file only needs to
//! mention what it changes:
//!
//! ```toml
//! probe_length = 120
//!
//! [tiling]
//! max_uncovered_edge_bases = 20
//! max_overlap = 60
//! extension_balance = 0.5
//! shift_max = 10
//!
//! [coverage]
//! max_indel_for_coverage_check = 30
//! ```
//!
//! Acceptance [`Criteria`](crate::evaluate::Criteria) travel with each
//! request rather than the configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::coverage::CoveragePolicy;
use crate::error::PanelError;

/// Top-level panel configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Length of every probe in bases (default: 120)
    pub probe_length: i64,
    /// Tiling and local shift parameters
    pub tiling: TilingConfig,
    /// Coverage checks against earlier phases
    pub coverage: CoveragePolicy,
}

/// Parameters of the tiling and local shift algorithms
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Total target bases that may be left uncovered at the edges to save a probe (default: 20)
    pub max_uncovered_edge_bases: i64,
    /// Largest overlap between neighbouring probes (default: 60)
    pub max_overlap: i64,
    /// Share of spare bases spent extending past the target rather than overlapping (default: 0.5)
    pub extension_balance: f64,
    /// Furthest a tiled probe may be shifted from its ideal start (default: 10)
    pub shift_max: i64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            probe_length: 120,
            tiling: TilingConfig::default(),
            coverage: CoveragePolicy::default(),
        }
    }
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            max_uncovered_edge_bases: 20,
            max_overlap: 60,
            extension_balance: 0.5,
            shift_max: 10,
        }
    }
}

impl PanelConfig {
    /// Parse and validate configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, PanelError> {
        let config: PanelConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PanelError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), PanelError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn with_probe_length(mut self, probe_length: i64) -> Self {
        self.probe_length = probe_length;
        self
    }

    pub fn with_max_uncovered_edge_bases(mut self, bases: i64) -> Self {
        self.tiling.max_uncovered_edge_bases = bases;
        self
    }

    pub fn with_max_overlap(mut self, max_overlap: i64) -> Self {
        self.tiling.max_overlap = max_overlap;
        self
    }

    pub fn with_extension_balance(mut self, balance: f64) -> Self {
        self.tiling.extension_balance = balance;
        self
    }

    pub fn with_shift_max(mut self, shift_max: i64) -> Self {
        self.tiling.shift_max = shift_max;
        self
    }

    pub fn with_max_indel_for_coverage_check(mut self, max_indel: i64) -> Self {
        self.coverage.max_indel_for_coverage_check = max_indel;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PanelError> {
        if self.probe_length < 1 {
            return Err(invalid(format!(
                "probe_length must be positive, got {}",
                self.probe_length
            )));
        }
        let tiling = &self.tiling;
        if tiling.max_uncovered_edge_bases < 0 {
            return Err(invalid(format!(
                "tiling.max_uncovered_edge_bases must not be negative, got {}",
                tiling.max_uncovered_edge_bases
            )));
        }
        if tiling.max_overlap < 0 || tiling.max_overlap >= self.probe_length {
            return Err(invalid(format!(
                "tiling.max_overlap must be in [0, {}), got {}",
                self.probe_length, tiling.max_overlap
            )));
        }
        if !(0.0..=1.0).contains(&tiling.extension_balance) {
            return Err(invalid(format!(
                "tiling.extension_balance must be in [0, 1], got {}",
                tiling.extension_balance
            )));
        }
        if tiling.shift_max < 0 {
            return Err(invalid(format!(
                "tiling.shift_max must not be negative, got {}",
                tiling.shift_max
            )));
        }
        if self.coverage.max_indel_for_coverage_check < 0 {
            return Err(invalid(format!(
                "coverage.max_indel_for_coverage_check must not be negative, got {}",
                self.coverage.max_indel_for_coverage_check
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> PanelError {
    PanelError::InvalidConfig { msg }
}
