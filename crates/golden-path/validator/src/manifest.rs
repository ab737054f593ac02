//! Route manifest: the static map of module routes and guard bindings
//!
//! ```yaml
//! modules:
//!   - module_code: MOD-04
//!     base_path: /portal/immobilien
//!     tiles: [portfolio]
//!     dynamic_routes: [":id"]
//!     guards:
//!       - path: ":id"
//!         golden_path: MOD-04
//! ```
//!
//! Relative paths are joined onto `base_path`; a path with a leading `/`
//! is taken as-is.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use golden_path_types::ModuleCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a route manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for manifest loading
pub type ManifestResult<T> = Result<T, ManifestError>;

/// A guard wrapping one route with a Golden Path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardBinding {
    pub path: String,
    pub golden_path: ModuleCode,
}

/// Routes owned by one module
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRoutes {
    pub module_code: ModuleCode,
    pub base_path: String,
    #[serde(default)]
    pub tiles: Vec<String>,
    #[serde(default)]
    pub dynamic_routes: Vec<String>,
    #[serde(default)]
    pub guards: Vec<GuardBinding>,
}

impl ModuleRoutes {
    /// Every full route of the module, base path included
    pub fn full_routes(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.base_path.clone()).chain(
            self.tiles
                .iter()
                .chain(self.dynamic_routes.iter())
                .map(|path| join_route(&self.base_path, path)),
        )
    }
}

/// The route manifest
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteManifest {
    #[serde(default)]
    pub modules: Vec<ModuleRoutes>,
}

impl RouteManifest {
    pub fn from_yaml_str(yaml: &str) -> ManifestResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json_str(json: &str) -> ManifestResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML
    pub fn load(path: impl AsRef<Path>) -> ManifestResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            _ => Self::from_yaml_str(&raw),
        }
    }

    pub fn with_module(mut self, module: ModuleRoutes) -> Self {
        self.modules.push(module);
        self
    }

    /// All routes, normalized with `placeholder`
    pub fn normalized_routes(&self, placeholder: &str) -> BTreeSet<String> {
        self.modules
            .iter()
            .flat_map(ModuleRoutes::full_routes)
            .map(|route| normalize_route(&route, placeholder))
            .collect()
    }

    /// A guard somewhere in the manifest binds this Golden Path
    pub fn has_guard_for(&self, module_code: &ModuleCode) -> bool {
        self.modules
            .iter()
            .flat_map(|m| m.guards.iter())
            .any(|g| &g.golden_path == module_code)
    }
}

/// Join a relative manifest path onto a base path
pub fn join_route(base_path: &str, path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else if path.is_empty() {
        base_path.to_string()
    } else {
        format!("{}/{}", base_path.trim_end_matches('/'), path)
    }
}

/// Canonical form of a route: no query string, no trailing slash, and every
/// `:name` segment replaced by `placeholder`
pub fn normalize_route(route: &str, placeholder: &str) -> String {
    let path = route.split(['?', '#']).next().unwrap_or_default();
    let normalized = path
        .split('/')
        .map(|segment| {
            if segment.starts_with(':') {
                placeholder
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/");

    let trimmed = normalized.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
modules:
  - module_code: MOD-04
    base_path: /portal/immobilien
    tiles: [portfolio]
    dynamic_routes: [":id"]
    guards:
      - path: ":id"
        golden_path: MOD-04
  - module_code: Z1
    base_path: /admin
    tiles: [sales-desk, /admin/finance/]
"#;

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("/portal/immobilien/:id", ":param"), "/portal/immobilien/:param");
        assert_eq!(
            normalize_route("/portal/finanzierung-manager/:requestId/", ":param"),
            "/portal/finanzierung-manager/:param"
        );
        assert_eq!(normalize_route("/admin/sales-desk?tab=open", ":param"), "/admin/sales-desk");
        assert_eq!(normalize_route("/", ":param"), "/");
    }

    #[test]
    fn test_join_route() {
        assert_eq!(join_route("/admin", "sales-desk"), "/admin/sales-desk");
        assert_eq!(join_route("/admin/", "finance"), "/admin/finance");
        assert_eq!(join_route("/admin", "/portal/x"), "/portal/x");
    }

    #[test]
    fn test_parse_and_collect_routes() {
        let manifest = RouteManifest::from_yaml_str(MANIFEST).unwrap();
        let routes = manifest.normalized_routes(":param");

        assert!(routes.contains("/portal/immobilien"));
        assert!(routes.contains("/portal/immobilien/portfolio"));
        assert!(routes.contains("/portal/immobilien/:param"));
        assert!(routes.contains("/admin/sales-desk"));
        assert!(routes.contains("/admin/finance"));
    }

    #[test]
    fn test_guard_lookup() {
        let manifest = RouteManifest::from_yaml_str(MANIFEST).unwrap();
        assert!(manifest.has_guard_for(&ModuleCode::new("MOD-04")));
        assert!(!manifest.has_guard_for(&ModuleCode::new("GP-PET")));
    }

    #[test]
    fn test_invalid_manifest() {
        let result = RouteManifest::from_yaml_str("modules: [{ base_path: 3 }]");
        assert!(matches!(result, Err(ManifestError::Yaml(_))));
    }
}
