use globset::GlobSetBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::walker::{compile_glob, FileWalker};
use crate::error::{Result, StackshiftError};

/// Dependency and build manifests recognised at the project root
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "requirements.txt",
    "Pipfile",
    "pyproject.toml",
    "Gemfile",
    "Cargo.toml",
    "go.mod",
    "composer.json",
    "*.csproj",
    "*.sln",
    "Makefile",
    "CMakeLists.txt",
];

/// Bucket for files without an extension
pub const NO_EXTENSION: &str = "(no extension)";

/// File counts and manifests of a project, used when no rule catalog applies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInventory {
    pub total_files: usize,
    /// Counts keyed by `.ext`
    pub by_extension: BTreeMap<String, usize>,
    /// Absolute manifest paths, sorted
    pub manifests: Vec<PathBuf>,
}

impl FileInventory {
    /// Count the files matching `glob` and discover root-level manifests
    pub fn collect(walker: &FileWalker, root: &Path, glob: &str) -> Result<Self> {
        let files = walker.walk(root, glob)?;

        let mut by_extension = BTreeMap::new();
        for file in &files {
            let key = file
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_else(|| NO_EXTENSION.to_string());
            *by_extension.entry(key).or_insert(0) += 1;
        }

        Ok(Self {
            total_files: files.len(),
            by_extension,
            manifests: find_manifests(root)?,
        })
    }

    /// Extensions ordered by count (descending), ties by name
    pub fn extensions_by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .by_extension
            .iter()
            .map(|(ext, count)| (ext.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn is_empty(&self) -> bool {
        self.total_files == 0 && self.manifests.is_empty()
    }
}

/// Manifest files directly inside `root`
pub fn find_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let mut builder = GlobSetBuilder::new();
    for pattern in MANIFEST_FILES {
        builder.add(compile_glob(pattern)?);
    }
    let manifests = builder
        .build()
        .map_err(|e| StackshiftError::FileSystem(e.to_string()))?;

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| manifests.is_match(e.file_name()))
        .map(|e| e.into_path())
        .collect();

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scanner::DEFAULT_IGNORE_PATTERNS;
    use std::fs;

    #[test]
    fn test_inventory_counts_extensions_and_manifests() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/main/java")).unwrap();
        fs::create_dir_all(root.join("node_modules/x")).unwrap();
        fs::write(root.join("src/main/java/App.java"), "class App {}").unwrap();
        fs::write(root.join("src/main/java/Util.java"), "class Util {}").unwrap();
        fs::write(root.join("src/main/java/app.xml"), "<x/>").unwrap();
        fs::write(root.join("node_modules/x/index.java"), "").unwrap();
        fs::write(root.join("pom.xml"), "<project/>").unwrap();
        fs::write(root.join("Service.csproj"), "<Project/>").unwrap();
        fs::write(root.join("README.md"), "# readme").unwrap();

        let walker = FileWalker::new(DEFAULT_IGNORE_PATTERNS).unwrap();
        let inventory = FileInventory::collect(&walker, root, "**/*.{java,xml}").unwrap();

        assert_eq!(inventory.total_files, 4);
        assert_eq!(inventory.by_extension.get(".java"), Some(&2));
        assert_eq!(inventory.by_extension.get(".xml"), Some(&2));
        let names: Vec<_> = inventory
            .manifests
            .iter()
            .map(|m| m.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["Service.csproj", "pom.xml"]);
    }

    #[test]
    fn test_extensions_by_count() {
        let mut inventory = FileInventory::default();
        inventory.by_extension.insert(".js".to_string(), 3);
        inventory.by_extension.insert(".ts".to_string(), 9);
        inventory.by_extension.insert(".css".to_string(), 3);
        inventory.by_extension.insert(NO_EXTENSION.to_string(), 1);

        assert_eq!(
            inventory.extensions_by_count(),
            vec![(".ts", 9), (".css", 3), (".js", 3), (NO_EXTENSION, 1)]
        );
    }

    #[test]
    fn test_files_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Makefile"), "all:").unwrap();
        fs::write(dir.path().join("run"), "#!/bin/sh").unwrap();

        let walker = FileWalker::new(DEFAULT_IGNORE_PATTERNS).unwrap();
        let inventory = FileInventory::collect(&walker, dir.path(), "**/*").unwrap();

        assert_eq!(inventory.total_files, 2);
        assert_eq!(inventory.by_extension.get(NO_EXTENSION), Some(&2));
        assert_eq!(inventory.manifests.len(), 1);
    }
}
