//! CLI configuration file

use golden_path_engine::EngineConfig;
use golden_path_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};

use crate::error::{read_file, CliResult};

/// ```yaml
/// engine:
///   default_route: /portal
///   context_staleness_secs: 30
/// validator:
///   enabled: true
///   exempt_prefixes: [/auth, /website]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub engine: EngineConfig,
    pub validator: ValidatorConfig,
}

impl CliConfig {
    /// Load from `path`, or defaults when none is given
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        match path {
            Some(path) => Self::from_yaml_str(&read_file(path)?),
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}
