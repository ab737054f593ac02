//! Validator configuration.

use std::path::Path;

use golden_path_types::{GoldenPathError, GoldenPathResult};
use serde::{Deserialize, Serialize};

/// Configuration for the startup audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Run the audit at all. Off in release builds by default.
    pub enabled: bool,

    /// Route prefixes that need no manifest entry.
    pub exempt_prefixes: Vec<String>,

    /// Canonical placeholder every `:name` path segment is rewritten to.
    pub route_placeholder: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            enabled: cfg!(debug_assertions),
            exempt_prefixes: vec!["/auth".to_string(), "/website".to_string()],
            route_placeholder: ":param".to_string(),
        }
    }
}

impl ValidatorConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_exempt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exempt_prefixes.push(prefix.into());
        self
    }

    /// The route is an exempt prefix or lies below one, on a segment boundary
    pub fn is_exempt(&self, route: &str) -> bool {
        self.exempt_prefixes.iter().any(|prefix| {
            route
                .strip_prefix(prefix.trim_end_matches('/'))
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub fn from_yaml_str(yaml: &str) -> GoldenPathResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| GoldenPathError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> GoldenPathResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GoldenPathError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exempt_prefixes() {
        let config = ValidatorConfig::enabled();
        assert!(config.is_exempt("/auth/login"));
        assert!(config.is_exempt("/website/kaufy"));
        assert!(!config.is_exempt("/portal/immobilien"));
    }

    #[test]
    fn test_exempt_prefix_matches_whole_segments() {
        let config = ValidatorConfig::enabled().with_exempt_prefix("/public/");
        assert!(config.is_exempt("/auth"));
        assert!(!config.is_exempt("/authority/settings"));
        assert!(!config.is_exempt("/websites-admin"));
        assert!(config.is_exempt("/public/impressum"));
        assert!(!config.is_exempt("/publications"));
    }

    #[test]
    fn test_yaml_overrides() {
        let config = ValidatorConfig::from_yaml_str(
            "enabled: true\nexempt_prefixes: [/public]\n",
        )
        .unwrap();
        assert!(config.enabled);
        assert_eq!(config.exempt_prefixes, vec!["/public".to_string()]);
        assert_eq!(config.route_placeholder, ":param");
    }
}
