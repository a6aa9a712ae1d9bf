use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::types::MigrationProfile;
use crate::core::findings::Severity;
use crate::core::scanner::Manifest;
use crate::error::{Result, StackshiftError};

/// Catalogs compiled into the binary
const BUILTIN_PROFILES: &[(&str, &str)] = &[
    (
        "angular-legacy-to-modern",
        include_str!("../../../profiles/angular-legacy-to-modern.toml"),
    ),
    (
        "angularjs-to-angular",
        include_str!("../../../profiles/angularjs-to-angular.toml"),
    ),
    ("commonjs-to-esm", include_str!("../../../profiles/commonjs-to-esm.toml")),
    ("cra-to-nextjs", include_str!("../../../profiles/cra-to-nextjs.toml")),
    ("express-to-fastify", include_str!("../../../profiles/express-to-fastify.toml")),
    ("java-to-kotlin", include_str!("../../../profiles/java-to-kotlin.toml")),
    ("jquery-to-vanilla", include_str!("../../../profiles/jquery-to-vanilla.toml")),
    ("js-to-typescript", include_str!("../../../profiles/js-to-typescript.toml")),
    ("mysql-to-postgresql", include_str!("../../../profiles/mysql-to-postgresql.toml")),
    ("python2-to-python3", include_str!("../../../profiles/python2-to-python3.toml")),
    (
        "react-class-to-hooks",
        include_str!("../../../profiles/react-class-to-hooks.toml"),
    ),
    ("rest-to-graphql", include_str!("../../../profiles/rest-to-graphql.toml")),
    ("vue2-to-vue3", include_str!("../../../profiles/vue2-to-vue3.toml")),
    ("webpack-to-vite", include_str!("../../../profiles/webpack-to-vite.toml")),
];

/// Immutable lookup of migration profiles by id.
///
/// Constructed once and handed to the engine; nothing in the crate keeps a
/// process-wide copy.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, MigrationProfile>,
}

impl ProfileRegistry {
    /// Registry holding only the built-in catalogs
    pub fn builtin() -> Result<Self> {
        let mut profiles = BTreeMap::new();
        for (name, source) in BUILTIN_PROFILES {
            let profile = parse_profile(name, source)?;
            profiles.insert(profile.id.clone(), profile);
        }
        Ok(Self { profiles })
    }

    /// Built-in catalogs plus every `*.toml` file found directly inside `extra_dirs`.
    /// A profile whose id is already registered replaces the earlier one.
    pub fn load(extra_dirs: &[PathBuf]) -> Result<Self> {
        let mut registry = Self::builtin()?;

        for dir in extra_dirs {
            if !dir.is_dir() {
                return Err(StackshiftError::Config(format!(
                    "Profile directory does not exist: {}",
                    dir.display()
                )));
            }

            let mut files: Vec<PathBuf> = WalkDir::new(dir)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| p.extension().map_or(false, |ext| ext == "toml"))
                .collect();
            files.sort();

            for file in files {
                let source = std::fs::read_to_string(&file)?;
                let profile = parse_profile(&file.display().to_string(), &source)?;
                if registry.profiles.contains_key(&profile.id) {
                    info!("📦 Profile {} overridden by {}", profile.id, file.display());
                } else {
                    debug!("Loaded profile {} from {}", profile.id, file.display());
                }
                registry.profiles.insert(profile.id.clone(), profile);
            }
        }

        Ok(registry)
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = MigrationProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&MigrationProfile> {
        self.profiles.get(id)
    }

    /// Look up a profile, failing with the list of valid ids
    pub fn require(&self, id: &str) -> Result<&MigrationProfile> {
        self.get(id).ok_or_else(|| StackshiftError::UnknownProfile {
            id: id.to_string(),
            available: self.ids(),
        })
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &MigrationProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Best-matching profile for a manifest, scoring each profile's dependency
    /// rules (breaking = 3, otherwise 1). Ties keep the first id in sorted order.
    pub fn detect(&self, manifest: &Manifest) -> Option<&MigrationProfile> {
        let mut best: Option<&MigrationProfile> = None;
        let mut best_score = 0u32;

        for profile in self.profiles.values() {
            let score: u32 = profile
                .dependency_rules
                .iter()
                .filter(|rule| manifest.version(&rule.name).is_some())
                .map(|rule| if rule.severity == Severity::Breaking { 3 } else { 1 })
                .sum();

            if score > best_score {
                best_score = score;
                best = Some(profile);
            }
        }

        if let Some(profile) = best {
            debug!("Detected profile {} (score {})", profile.id, best_score);
        }
        best
    }

    /// Detect from the project's root manifest; a missing or malformed manifest detects nothing
    pub async fn detect_for_project(&self, project: &Path) -> Option<&MigrationProfile> {
        let manifest = Manifest::load(project).await?;
        self.detect(&manifest)
    }

    /// Use the explicit id when given, otherwise auto-detect
    pub async fn resolve(&self, project: &Path, id: Option<&str>) -> Result<&MigrationProfile> {
        match id {
            Some(id) => self.require(id),
            None => self
                .detect_for_project(project)
                .await
                .ok_or_else(|| StackshiftError::ProfileNotDetected {
                    available: self.ids(),
                }),
        }
    }

    /// Profile whose source and target aliases both occur in the given names
    pub fn match_aliases(&self, source: &str, target: &str) -> Option<&MigrationProfile> {
        let source = source.trim().to_lowercase();
        let target = target.trim().to_lowercase();

        self.profiles.values().find(|profile| {
            let source_match = profile
                .source_aliases
                .iter()
                .any(|alias| source.contains(alias.as_str()));
            let target_match = profile
                .target_aliases
                .iter()
                .any(|alias| target.contains(alias.as_str()));
            source_match && target_match
        })
    }
}

fn parse_profile(name: &str, source: &str) -> Result<MigrationProfile> {
    let profile: MigrationProfile = toml::from_str(source).map_err(|e| StackshiftError::Catalog {
        name: name.to_string(),
        message: e.to_string(),
    })?;

    if profile.id.trim().is_empty() {
        return Err(StackshiftError::Catalog {
            name: name.to_string(),
            message: "profile id must not be empty".to_string(),
        });
    }

    Ok(profile)
}
