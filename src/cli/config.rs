//! TOML configuration for the `summary` command.
//!
//! The run layout normally lives next to the metric files:
//!
//! ```toml
//! # run.toml
//! [summary]
//! skip_median = false
//!
//! [run]
//! channels = ["A", "C", "G", "T"]
//! flowcell = { lane_count = 8, surface_count = 2, swath_count = 2, tile_count = 14 }
//!
//! [[run.reads]]
//! number = 1
//! first_cycle = 1
//! last_cycle = 151
//!
//! [[run.reads]]
//! number = 2
//! first_cycle = 152
//! last_cycle = 159
//! is_index = true
//! ```

use anyhow::{Context, Result};
use interop::run::RunLayout;
use interop::summary::SummaryOptions;
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for run.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Summary engine settings.
    #[serde(default)]
    pub summary: SummaryOptions,

    /// Read structure, flow cell geometry and channel order.
    #[serde(default)]
    pub run: RunLayout,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [summary]
            skip_median = true

            [run]
            channels = ["Red", "Green"]
            flowcell = { lane_count = 2, surface_count = 2, swath_count = 2, tile_count = 16 }

            [[run.reads]]
            number = 1
            first_cycle = 1
            last_cycle = 26

            [[run.reads]]
            number = 2
            first_cycle = 27
            last_cycle = 76
            is_index = true
        "#;

        let config = Config::from_str(toml).unwrap();
        assert!(config.summary.skip_median);
        assert_eq!(config.run.channels, vec!["Red", "Green"]);
        assert_eq!(config.run.flowcell.lane_count, 2);
        assert_eq!(config.run.flowcell.tiles_per_lane(), 64);
        assert_eq!(config.run.reads.len(), 2);
        assert_eq!(config.run.reads[1].first_cycle, 27);
        assert!(config.run.reads[1].is_index);
        assert!(!config.run.reads[0].is_index);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [run]
            flowcell = { lane_count = 4 }
            reads = [{ number = 1, first_cycle = 1, last_cycle = 101 }]
        "#;

        let config = Config::from_str(toml).unwrap();
        assert!(!config.summary.skip_median);
        assert_eq!(config.run.flowcell.surface_count, 2);
        assert_eq!(config.run.flowcell.swath_count, 1);
        assert_eq!(config.run.channels, vec!["A", "C", "G", "T"]);
        assert_eq!(config.run.total_cycles(), 101);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert!(!config.summary.skip_median);
        assert!(config.run.reads.is_empty());
    }

    #[test]
    fn test_invalid_config() {
        let err = Config::from_str("[run]\nreads = 3").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }
}
