//! Route manifest bundled with the catalog

use golden_path_validator::{ManifestResult, RouteManifest};

const ROUTES_YAML: &str = include_str!("../manifests/routes.yaml");

/// The route manifest covering every built-in definition
pub fn bundled_manifest() -> ManifestResult<RouteManifest> {
    RouteManifest::from_yaml_str(ROUTES_YAML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_path_types::ModuleCode;

    #[test]
    fn test_bundled_manifest_parses() {
        let manifest = bundled_manifest().unwrap();
        assert_eq!(manifest.modules.len(), 5);
        assert!(manifest.has_guard_for(&ModuleCode::new("MOD-04")));
        assert!(manifest.has_guard_for(&ModuleCode::new("GP-PET")));
        assert!(manifest.has_guard_for(&ModuleCode::new("GP-MANAGER-LIFECYCLE")));

        let routes = manifest.normalized_routes(":param");
        assert!(routes.contains("/portal/immobilien/:param"));
        assert!(routes.contains("/admin/pet-desk"));
        assert!(routes.contains("/admin/armstrong"));
        assert!(routes.contains("/portal/stammdaten"));
    }
}
