//! Routing configuration.
//!
//! `RouteConfig` carries every tunable the transport queries read. It can be
//! loaded from JSON (missing fields fall back to defaults) and adjusted one
//! named option at a time from the route console.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::map::Connectivity;
use crate::search::{SearchMode, SearchParams};

/// How the façade picks an embarkation tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbarkStrategy {
    /// Closest owned shore by Manhattan distance.
    #[default]
    Nearest,
    /// Cheapest route among the bounded candidate set.
    Optimized,
}

impl EmbarkStrategy {
    pub fn from_name(name: &str) -> Option<EmbarkStrategy> {
        match name.to_ascii_lowercase().as_str() {
            "nearest" => Some(EmbarkStrategy::Nearest),
            "optimized" | "optimised" => Some(EmbarkStrategy::Optimized),
            _ => None,
        }
    }
}

/// Errors raised while loading or changing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// Tunables for the transport queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Upper bound on embarkation candidates evaluated by the optimiser.
    pub max_candidates: usize,
    /// Node budget for each optimiser search.
    pub deploy_node_budget: u32,
    /// Node budget for each per-tick movement search.
    pub step_node_budget: u32,
    /// Prefer water away from the coastline.
    pub bias_offshore: bool,
    pub connectivity: Connectivity,
    /// Evaluate optimiser candidates on the rayon pool.
    pub parallel_candidates: bool,
    pub embark_strategy: EmbarkStrategy,
}

impl Default for RouteConfig {
    fn default() -> Self {
        RouteConfig {
            max_candidates: 20,
            deploy_node_budget: 100_000,
            step_node_budget: 200_000,
            bias_offshore: true,
            connectivity: Connectivity::Four,
            parallel_candidates: false,
            embark_strategy: EmbarkStrategy::Nearest,
        }
    }
}

impl RouteConfig {
    /// Parses a JSON object; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Sets one option by name (case-insensitive).
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            name: name.to_string(),
            value: value.to_string(),
        };
        match name.to_ascii_lowercase().as_str() {
            "maxcandidates" => self.max_candidates = value.parse().map_err(|_| invalid())?,
            "deploynodebudget" => self.deploy_node_budget = value.parse().map_err(|_| invalid())?,
            "stepnodebudget" => self.step_node_budget = value.parse().map_err(|_| invalid())?,
            "biasoffshore" => self.bias_offshore = parse_flag(value).ok_or_else(invalid)?,
            "connectivity" => {
                let n: u8 = value.parse().map_err(|_| invalid())?;
                self.connectivity = Connectivity::try_from(n).map_err(|_| invalid())?;
            }
            "parallelcandidates" => {
                self.parallel_candidates = parse_flag(value).ok_or_else(invalid)?
            }
            "embarkstrategy" => {
                self.embark_strategy = EmbarkStrategy::from_name(value).ok_or_else(invalid)?
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Search parameters for ranking embarkation candidates.
    pub fn deploy_params(&self) -> SearchParams {
        SearchParams::new(self.deploy_node_budget)
            .with_bias(self.bias_offshore)
            .with_connectivity(self.connectivity)
    }

    /// Search parameters for advancing a transport one tile.
    pub fn step_params(&self) -> SearchParams {
        SearchParams::new(self.step_node_budget)
            .with_bias(self.bias_offshore)
            .with_connectivity(self.connectivity)
            .with_mode(SearchMode::NextStep)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "on" | "1" | "yes" => Some(true),
        "false" | "off" | "0" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        assert_eq!(RouteConfig::from_json("{}").unwrap(), RouteConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg = RouteConfig::from_json(
            r#"{"max_candidates": 5, "connectivity": 8, "embark_strategy": "optimized"}"#,
        )
        .unwrap();
        assert_eq!(cfg.max_candidates, 5);
        assert_eq!(cfg.connectivity, Connectivity::Eight);
        assert_eq!(cfg.embark_strategy, EmbarkStrategy::Optimized);
        assert_eq!(cfg.deploy_node_budget, RouteConfig::default().deploy_node_budget);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(matches!(
            RouteConfig::from_json(r#"{"connectivity": 6}"#),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            RouteConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn set_option_by_name() {
        let mut cfg = RouteConfig::default();
        cfg.set_option("MaxCandidates", "7").unwrap();
        cfg.set_option("BiasOffshore", "off").unwrap();
        cfg.set_option("Connectivity", "8").unwrap();
        cfg.set_option("EmbarkStrategy", "Optimized").unwrap();
        cfg.set_option("parallelcandidates", "true").unwrap();
        assert_eq!(cfg.max_candidates, 7);
        assert!(!cfg.bias_offshore);
        assert_eq!(cfg.connectivity, Connectivity::Eight);
        assert_eq!(cfg.embark_strategy, EmbarkStrategy::Optimized);
        assert!(cfg.parallel_candidates);
    }

    #[test]
    fn set_option_errors() {
        let mut cfg = RouteConfig::default();
        assert!(matches!(
            cfg.set_option("Bogus", "1"),
            Err(ConfigError::UnknownOption(_))
        ));
        assert!(matches!(
            cfg.set_option("Connectivity", "3"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set_option("StepNodeBudget", "-1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg, RouteConfig::default());
    }

    #[test]
    fn params_follow_config() {
        let cfg = RouteConfig::default();
        let deploy = cfg.deploy_params();
        assert_eq!(deploy.node_budget, cfg.deploy_node_budget);
        assert_eq!(deploy.mode, SearchMode::FullPath);
        let step = cfg.step_params();
        assert_eq!(step.mode, SearchMode::NextStep);
        assert!(step.bias_offshore);
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("seaway-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"step_node_budget": 42}"#).unwrap();
        let cfg = RouteConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(cfg.step_node_budget, 42);
        assert!(matches!(
            RouteConfig::load(&path),
            Err(ConfigError::Io(_))
        ));
    }
}
