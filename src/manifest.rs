//! `package.json` emission from a composition's merged dependency sets.

use cruet::Inflector;
use indexmap::IndexMap;
use serde::Serialize;

use crate::engine::CompositionResult;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageJson {
    pub name: String,
    pub version: String,
    pub private: bool,
    pub main: String,
    pub scripts: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageJson {
    /// Builds the manifest for `project_name`; the package name is kebab-cased.
    pub fn new(project_name: &str, composition: &CompositionResult) -> Self {
        let scripts = [
            ("dev", "ts-node src/main.ts"),
            ("build", "tsc"),
            ("start", "node dist/main.js"),
        ]
        .into_iter()
        .map(|(name, command)| (name.to_string(), command.to_string()))
        .collect();

        PackageJson {
            name: project_name.to_kebab_case(),
            version: "1.0.0".to_string(),
            private: true,
            main: "dist/main.js".to_string(),
            scripts,
            dependencies: composition.dependencies().to_manifest(),
            dev_dependencies: composition.dev_dependencies().to_manifest(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
