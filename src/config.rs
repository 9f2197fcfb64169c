//! Engine configuration.
//!
//! ```
//! use vecscore::config::EngineConfig;
//! use vecscore::distance::DistanceMethod;
//!
//! let config = EngineConfig::builder()
//!     .script_source("knn_rescore")
//!     .default_method(DistanceMethod::L2)
//!     .build();
//!
//! assert_eq!(config.engine_type, "binary_vector");
//! assert_eq!(config.default_method, Some(DistanceMethod::L2));
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMethod;
use crate::error::{Result, VecScoreError};

pub const DEFAULT_ENGINE_TYPE: &str = "binary_vector";
pub const DEFAULT_SCRIPT_SOURCE: &str = "binary_vector_score";

/// Identity and defaults of a scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Language name under which the host registers the engine.
    pub engine_type: String,

    /// The only script source the engine accepts.
    pub script_source: String,

    /// Method used when neither the caller nor the parameters name one.
    /// With no default, the `cosine` flag chooses between cosine and dot.
    pub default_method: Option<DistanceMethod>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            engine_type: DEFAULT_ENGINE_TYPE.to_string(),
            script_source: DEFAULT_SCRIPT_SOURCE.to_string(),
            default_method: None,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Parse a configuration from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Reject empty identifiers.
    pub fn validate(&self) -> Result<()> {
        if self.engine_type.is_empty() {
            return Err(VecScoreError::config("engine_type must not be empty"));
        }
        if self.script_source.is_empty() {
            return Err(VecScoreError::config("script_source must not be empty"));
        }
        Ok(())
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    pub fn engine_type(mut self, engine_type: impl Into<String>) -> Self {
        self.config.engine_type = engine_type.into();
        self
    }

    pub fn script_source(mut self, script_source: impl Into<String>) -> Self {
        self.config.script_source = script_source.into();
        self
    }

    pub fn default_method(mut self, method: DistanceMethod) -> Self {
        self.config.default_method = Some(method);
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.engine_type, DEFAULT_ENGINE_TYPE);
        assert_eq!(config.script_source, DEFAULT_SCRIPT_SOURCE);
        assert_eq!(config.default_method, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json_str(r#"{"default_method": "hamming"}"#).unwrap();
        assert_eq!(config.default_method, Some(DistanceMethod::Hamming));
        assert_eq!(config.script_source, DEFAULT_SCRIPT_SOURCE);
    }

    #[test]
    fn test_from_json_rejects_empty_source() {
        let err = EngineConfig::from_json_str(r#"{"script_source": ""}"#).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"engine_type": "vectors", "default_method": "dot"}}"#).unwrap();

        let config = EngineConfig::from_file(file.path()).unwrap();
        assert_eq!(config.engine_type, "vectors");
        assert_eq!(config.default_method, Some(DistanceMethod::Dot));
    }

    #[test]
    fn test_serde_round_trip() {
        let config = EngineConfig::builder()
            .engine_type("vectors")
            .default_method(DistanceMethod::Cosine)
            .build();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json_str(&json).unwrap(), config);
    }
}
