use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::core::findings::DependencyIssue;
use crate::core::profiles::DependencyRule;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(default)]
    dependencies: BTreeMap<String, Value>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, Value>,
}

/// Declared dependencies of a project, regular and development merged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    dependencies: BTreeMap<String, String>,
}

impl Manifest {
    pub const FILE_NAME: &'static str = "package.json";

    /// Parse a `package.json` document. Development entries override regular ones
    /// with the same name; empty or non-string versions are treated as absent.
    pub fn parse(content: &str) -> Result<Self> {
        let package: PackageJson = serde_json::from_str(content)?;

        let mut dependencies = BTreeMap::new();
        for (name, version) in package
            .dependencies
            .into_iter()
            .chain(package.dev_dependencies)
        {
            match version.as_str().map(str::trim) {
                Some(v) if !v.is_empty() => {
                    dependencies.insert(name, v.to_string());
                }
                _ => {
                    dependencies.remove(&name);
                }
            }
        }

        Ok(Self { dependencies })
    }

    /// Read the project's root manifest. Absence or a parse failure yields `None`.
    pub async fn load(project: &Path) -> Option<Self> {
        let path = project.join(Self::FILE_NAME);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("No readable manifest at {}: {}", path.display(), e);
                return None;
            }
        };

        match Self::parse(&content) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("⚠️ Ignoring malformed manifest {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn version(&self, name: &str) -> Option<&str> {
        self.dependencies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// One issue per rule whose dependency is declared, in rule order
pub fn analyze_dependencies(manifest: Option<&Manifest>, rules: &[DependencyRule]) -> Vec<DependencyIssue> {
    let Some(manifest) = manifest else {
        return Vec::new();
    };

    rules
        .iter()
        .filter_map(|rule| {
            manifest.version(&rule.name).map(|version| DependencyIssue {
                name: rule.name.clone(),
                current_version: version.to_string(),
                message: rule.message.clone(),
                severity: rule.severity,
            })
        })
        .collect()
}
