use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::DependencyScope;

/// The parts of a project's `package.json` the host reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
}

impl PackageManifest {
    pub fn has_dependency(&self, name: &str, scope: DependencyScope) -> bool {
        match scope {
            DependencyScope::Prod => self.dependencies.contains_key(name),
            DependencyScope::Dev => self.dev_dependencies.contains_key(name),
            DependencyScope::All => {
                self.dependencies.contains_key(name) || self.dev_dependencies.contains_key(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest() -> PackageManifest {
        serde_json::from_value(json!({
            "name": "shop",
            "dependencies": { "react": "^16.8.0" },
            "devDependencies": { "eslint": "^6.0.0" }
        }))
        .unwrap()
    }

    #[test]
    fn scope_selects_dependency_map() {
        let m = manifest();
        assert!(m.has_dependency("react", DependencyScope::All));
        assert!(m.has_dependency("react", DependencyScope::Prod));
        assert!(!m.has_dependency("react", DependencyScope::Dev));
        assert!(m.has_dependency("eslint", DependencyScope::Dev));
        assert!(!m.has_dependency("vue", DependencyScope::All));
    }

    #[test]
    fn missing_maps_default_to_empty() {
        let m: PackageManifest = serde_json::from_value(json!({ "name": "x" })).unwrap();
        assert!(!m.has_dependency("react", DependencyScope::All));
    }
}
