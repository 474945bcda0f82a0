//! Configuration System
//!
//! Provides hierarchical configuration loading from:
//! - config.toml (default configuration)
//! - config.local.toml (git-ignored local overrides)
//! - Environment variables (`DSIDE_` prefix)
//!
//! ## Example
//!
//! ```toml
//! # config.toml
//! [run]
//! run_path = "./run"
//! parallelism = 4
//! ```
//!
//! Environment variable overrides:
//! ```bash
//! DSIDE_RUN__PARALLELISM=8
//! DSIDE_EXPLORERS__DEFAULT_TIEBREAK=best-bid
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub run: RunConfig,
    #[serde(default)]
    pub identification: IdentificationConfig,
    #[serde(default)]
    pub explorers: ExplorersConfig,
}

/// Per-run tunables: artifact location, budgets, parallelism, log level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Base directory for intermediate and output artifacts.
    pub run_path: PathBuf,

    /// Maximum number of solutions to explore (0 = unlimited).
    #[serde(default)]
    pub x_max_solutions: u32,

    /// Wall-clock exploration timeout in seconds (0 = unlimited).
    #[serde(default)]
    pub x_improvement_timeout_sec: u32,

    /// Worker pool size for the rule engine (0 = logical CPU count).
    #[serde(default)]
    pub parallelism: usize,

    /// Log level: ERROR, WARN, INFO, DEBUG.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Identification-phase tunables. The iteration cap is derived
/// (`|G| * |rules|`), not configurable, so this section is presently empty
/// beyond its marker for future knobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentificationConfig {}

/// Explorer-matching tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorersConfig {
    /// Tie-break policy when the non-dominated (explorer, model) frontier
    /// has more than one pair: "first" or "best-bid".
    #[serde(default = "default_tiebreak")]
    pub default_tiebreak: String,
}

fn default_log_level() -> String {
    "INFO".to_string()
}

fn default_tiebreak() -> String {
    "first".to_string()
}

impl Default for ExplorersConfig {
    fn default() -> Self {
        ExplorersConfig {
            default_tiebreak: default_tiebreak(),
        }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Merges in order:
    /// 1. `config.toml` (base configuration)
    /// 2. `config.local.toml` (local overrides, git-ignored)
    /// 3. Environment variables (`DSIDE_` prefix, `__`-separated for nesting)
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Self::default_figment())
            .merge(Toml::file("config.toml"))
            .merge(Toml::file("config.local.toml"))
            .merge(Env::prefixed("DSIDE_").split("__"))
            .extract()
    }

    /// Load configuration from a specific file path.
    pub fn from_file(path: &str) -> Result<Self, figment::Error> {
        Figment::from(Self::default_figment())
            .merge(Toml::file(path))
            .merge(Env::prefixed("DSIDE_").split("__"))
            .extract()
    }

    fn default_figment() -> Figment {
        Figment::from(figment::providers::Serialized::defaults(Config::default()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            run: RunConfig {
                run_path: PathBuf::from("./run"),
                x_max_solutions: 0,
                x_improvement_timeout_sec: 0,
                parallelism: 0,
                log_level: default_log_level(),
            },
            identification: IdentificationConfig::default(),
            explorers: ExplorersConfig::default(),
        }
    }
}

impl RunConfig {
    /// Resolve `parallelism == 0` to the logical CPU count, matching the
    /// teacher's `PerformanceConfig::num_threads` convention.
    #[must_use]
    pub fn resolved_parallelism(&self) -> usize {
        if self.parallelism == 0 {
            num_cpus::get()
        } else {
            self.parallelism
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_run_path() {
        let config = Config::default();
        assert_eq!(config.run.run_path, PathBuf::from("./run"));
        assert_eq!(config.run.x_max_solutions, 0);
        assert_eq!(config.explorers.default_tiebreak, "first");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("[run]"));
        assert!(toml_str.contains("[explorers]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.run.run_path, config.run.run_path);
    }

    #[test]
    fn resolved_parallelism_falls_back_to_cpu_count() {
        let mut config = Config::default();
        config.run.parallelism = 0;
        assert_eq!(config.run.resolved_parallelism(), num_cpus::get());
        config.run.parallelism = 3;
        assert_eq!(config.run.resolved_parallelism(), 3);
    }
}
