//! Core configuration structure for the rule learner.

use crate::core::constants::{DEFAULT_NBINS, ENV_PREFIX};
use crate::core::error::{OneRError, Result};
use crate::core::types::{BinMethod, MissingPolicy, OptimalMethod, TiesMethod};
use crate::dataset::preprocessing::{NumericStrategy, PreprocessConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Learner configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneRConfig {
    /// Tie-break between equally accurate features
    pub ties_method: TiesMethod,
    /// Log the per-feature accuracy ranking after training
    pub verbose: bool,
    /// How the training table is discretized
    pub preprocessing: PreprocessConfig,
}

impl Default for OneRConfig {
    fn default() -> Self {
        OneRConfig {
            ties_method: TiesMethod::First,
            verbose: false,
            preprocessing: PreprocessConfig::default(),
        }
    }
}

impl OneRConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.preprocessing.validate()
    }

    /// Load configuration from a `.json` or `.toml` file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| OneRError::config(format!("Failed to read config file: {}", e)))?;

        let config: OneRConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| OneRError::config(format!("Failed to parse JSON config: {}", e)))?,
            Some("toml") => toml::from_str(&content)
                .map_err(|e| OneRError::config(format!("Failed to parse TOML config: {}", e)))?,
            _ => {
                return Err(OneRError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a `.json` or `.toml` file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => serde_json::to_string_pretty(self)
                .map_err(|e| OneRError::config(format!("Failed to serialize to JSON: {}", e)))?,
            Some("toml") => toml::to_string_pretty(self)
                .map_err(|e| OneRError::config(format!("Failed to serialize to TOML: {}", e)))?,
            _ => {
                return Err(OneRError::config(
                    "Unsupported config file format. Use .json or .toml",
                ))
            }
        };

        std::fs::write(path, content)
            .map_err(|e| OneRError::config(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Load configuration from `ONER_*` environment variables on top of the
    /// defaults
    pub fn load_from_environment() -> Result<Self> {
        let mut config = OneRConfig::default();
        config.apply_environment_overrides()?;
        Ok(config)
    }

    /// Override fields from the environment variables that are set.
    ///
    /// `ONER_OPTIMAL_METHOD` switches numeric features to supervised
    /// binning; `ONER_NBINS` and `ONER_BIN_METHOD` switch them back to
    /// unsupervised binning.
    pub fn apply_environment_overrides(&mut self) -> Result<()> {
        if let Some(val) = env_var("TIES_METHOD") {
            self.ties_method = val
                .parse()
                .map_err(|_| OneRError::config(format!("Invalid {}TIES_METHOD", ENV_PREFIX)))?;
        }

        if let Some(val) = env_var("MISSING") {
            self.preprocessing.missing = val
                .parse()
                .map_err(|_| OneRError::config(format!("Invalid {}MISSING", ENV_PREFIX)))?;
        }

        if let Some(val) = env_var("VERBOSE") {
            self.verbose = parse_flag(&val)
                .ok_or_else(|| OneRError::config(format!("Invalid {}VERBOSE", ENV_PREFIX)))?;
        }

        if let Some(val) = env_var("MAX_LEVELS") {
            let max_levels = val
                .parse()
                .map_err(|_| OneRError::config(format!("Invalid {}MAX_LEVELS", ENV_PREFIX)))?;
            self.preprocessing.max_levels = Some(max_levels);
        }

        if let Some(val) = env_var("OPTIMAL_METHOD") {
            let method: OptimalMethod = val
                .parse()
                .map_err(|_| OneRError::config(format!("Invalid {}OPTIMAL_METHOD", ENV_PREFIX)))?;
            self.preprocessing.numeric = NumericStrategy::Optimal { method };
        }

        let nbins = env_var("NBINS")
            .map(|val| {
                val.parse::<usize>()
                    .map_err(|_| OneRError::config(format!("Invalid {}NBINS", ENV_PREFIX)))
            })
            .transpose()?;
        let bin_method = env_var("BIN_METHOD")
            .map(|val| {
                val.parse::<BinMethod>()
                    .map_err(|_| OneRError::config(format!("Invalid {}BIN_METHOD", ENV_PREFIX)))
            })
            .transpose()?;
        if nbins.is_some() || bin_method.is_some() {
            let (current_method, current_nbins) = match self.preprocessing.numeric {
                NumericStrategy::Bin { method, nbins } => (method, nbins),
                NumericStrategy::Optimal { .. } => (BinMethod::default(), DEFAULT_NBINS),
            };
            self.preprocessing.numeric = NumericStrategy::Bin {
                method: bin_method.unwrap_or(current_method),
                nbins: nbins.unwrap_or(current_nbins),
            };
        }

        self.validate()
    }
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{}{}", ENV_PREFIX, suffix)).ok()
}

fn parse_flag(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for [`OneRConfig`] that collects validation errors until
/// [`ConfigBuilder::build`].
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: OneRConfig,
    validation_errors: Vec<String>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        ConfigBuilder {
            config: OneRConfig::default(),
            validation_errors: Vec::new(),
        }
    }

    /// Set the tie-break method
    pub fn ties_method(mut self, ties_method: TiesMethod) -> Self {
        self.config.ties_method = ties_method;
        self
    }

    /// Enable verbose ranking output
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Set the missing value policy
    pub fn missing(mut self, missing: MissingPolicy) -> Self {
        self.config.preprocessing.missing = missing;
        self
    }

    /// Bin numeric features into `nbins` bins with `method`
    pub fn bins(mut self, method: BinMethod, nbins: usize) -> Self {
        if nbins <= 1 {
            self.validation_errors
                .push(format!("nbins must be greater than 1, got {}", nbins));
        }
        self.config.preprocessing.numeric = NumericStrategy::Bin { method, nbins };
        self
    }

    /// Bin numeric features against the target with `method`
    pub fn optimal(mut self, method: OptimalMethod) -> Self {
        self.config.preprocessing.numeric = NumericStrategy::Optimal { method };
        self
    }

    /// Drop categorical features with more than `max_levels` levels
    pub fn max_levels(mut self, max_levels: usize) -> Self {
        if max_levels < 2 {
            self.validation_errors
                .push(format!("max_levels must be at least 2, got {}", max_levels));
        }
        self.config.preprocessing.max_levels = Some(max_levels);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<OneRConfig> {
        if !self.validation_errors.is_empty() {
            return Err(OneRError::config(format!(
                "Configuration validation failed: {}",
                self.validation_errors.join(", ")
            )));
        }

        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = OneRConfig::default();
        assert_eq!(config.ties_method, TiesMethod::First);
        assert_eq!(
            config.preprocessing.numeric,
            NumericStrategy::Bin {
                method: BinMethod::Length,
                nbins: 5
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .ties_method(TiesMethod::Chisq)
            .optimal(OptimalMethod::Infogain)
            .missing(MissingPolicy::Keep)
            .build()
            .unwrap();
        assert_eq!(config.ties_method, TiesMethod::Chisq);
        assert_eq!(config.preprocessing.missing, MissingPolicy::Keep);
    }

    #[test]
    fn test_builder_collects_errors() {
        let err = ConfigBuilder::new()
            .bins(BinMethod::Content, 1)
            .max_levels(0)
            .build()
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("nbins"));
        assert!(message.contains("max_levels"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let config = ConfigBuilder::new()
            .bins(BinMethod::Clusters, 4)
            .verbose(true)
            .build()
            .unwrap();

        for name in ["config.json", "config.toml"] {
            let path = dir.path().join(name);
            config.save_to_file(&path).unwrap();
            assert_eq!(OneRConfig::load_from_file(&path).unwrap(), config);
        }

        assert!(config.save_to_file(dir.path().join("config.yaml")).is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
