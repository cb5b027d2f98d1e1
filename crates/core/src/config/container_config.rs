use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::ContainerError;

/// Environment variable holding the injection depth limit
pub const MAX_INJECTION_DEPTH_ENV: &str = "TAGWIRE_MAX_INJECTION_DEPTH";

/// Container settings.
///
/// The defaults reproduce the plain container: injection recursion is not
/// bounded, so a binding cycle recurses until the stack runs out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Maximum nesting of recursive injection; `None` means unbounded
    pub max_injection_depth: Option<usize>,
}

impl ContainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound recursive injection to `depth` nested levels
    pub fn with_max_injection_depth(mut self, depth: usize) -> Self {
        self.max_injection_depth = Some(depth);
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ContainerError> {
        let max_injection_depth = match env::var(MAX_INJECTION_DEPTH_ENV) {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(raw.trim().parse::<usize>().map_err(|_| {
                ContainerError::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    MAX_INJECTION_DEPTH_ENV, raw
                ))
            })?),
            Err(env::VarError::NotPresent) => None,
            Err(env::VarError::NotUnicode(_)) => {
                return Err(ContainerError::configuration(format!(
                    "{} is not valid unicode",
                    MAX_INJECTION_DEPTH_ENV
                )))
            }
        };

        let config = Self {
            max_injection_depth,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document such as `{"max_injection_depth": 16}`
    pub fn from_json(source: &str) -> Result<Self, ContainerError> {
        let config: Self = serde_json::from_str(source)
            .map_err(|e| ContainerError::configuration(format!("invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML document such as `max_injection_depth: 16`
    pub fn from_yaml(source: &str) -> Result<Self, ContainerError> {
        let config: Self = serde_yaml::from_str(source)
            .map_err(|e| ContainerError::configuration(format!("invalid YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ContainerError> {
        if self.max_injection_depth == Some(0) {
            return Err(ContainerError::configuration(
                "max_injection_depth must be at least 1",
            ));
        }
        Ok(())
    }
}
