//! Engine configuration.
//!
//! Defines the fallback redirect route and the context staleness window.

use std::path::Path;
use std::time::Duration;

use golden_path_types::{GoldenPathError, GoldenPathResult};
use serde::{Deserialize, Serialize};

/// Configuration for evaluation and guard adapters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Redirect target when no checkpoint is reachable and the definition
    /// declares no `failure_redirect`.
    pub default_route: String,

    /// How long a resolved context is reused, in seconds.
    pub context_staleness_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_route: "/portal".to_string(),
            context_staleness_secs: 30,
        }
    }
}

impl EngineConfig {
    pub fn with_default_route(mut self, route: impl Into<String>) -> Self {
        self.default_route = route.into();
        self
    }

    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.context_staleness_secs = staleness.as_secs();
        self
    }

    /// Cache window as a [`Duration`]
    pub fn staleness(&self) -> Duration {
        Duration::from_secs(self.context_staleness_secs)
    }

    /// Parse from YAML. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> GoldenPathResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| GoldenPathError::Config(e.to_string()))
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> GoldenPathResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GoldenPathError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&raw)
    }
}
