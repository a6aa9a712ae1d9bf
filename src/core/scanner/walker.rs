use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, StackshiftError};

/// Build output, dependency, version-control and minified paths skipped by every walk
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/dist/**",
    "**/build/**",
    "**/.nuxt/**",
    "**/.next/**",
    "**/coverage/**",
    "**/*.min.js",
    "**/*.min.css",
];

/// Compile a glob over project-relative paths; `*` does not cross `/`
pub fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| StackshiftError::Glob {
            glob: pattern.to_string(),
            message: e.to_string(),
        })
}

fn compile_glob_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(compile_glob(pattern.as_ref())?);
    }
    builder.build().map_err(|e| StackshiftError::Glob {
        glob: patterns
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        message: e.to_string(),
    })
}

/// Enumerates project files selected by globs, minus the ignore patterns.
///
/// Hidden files and directories are skipped and `.gitignore` is not consulted,
/// so the file set depends only on the tree and the configured patterns.
#[derive(Debug, Clone)]
pub struct FileWalker {
    ignore: GlobSet,
}

impl FileWalker {
    pub fn new<S: AsRef<str>>(ignore_patterns: &[S]) -> Result<Self> {
        Ok(Self {
            ignore: compile_glob_set(ignore_patterns)?,
        })
    }

    /// Files under `root` matching `glob`
    pub fn walk(&self, root: &Path, glob: &str) -> Result<Vec<PathBuf>> {
        self.walk_all(root, &[glob])
    }

    /// Files under `root` matching any of `globs`, deduplicated and sorted by absolute path
    pub fn walk_all<S: AsRef<str>>(&self, root: &Path, globs: &[S]) -> Result<Vec<PathBuf>> {
        if globs.is_empty() {
            return Ok(Vec::new());
        }
        let selected = compile_glob_set(globs)?;

        let mut files: Vec<PathBuf> = self
            .entries(root)
            .into_iter()
            .filter(|path| {
                path.strip_prefix(root)
                    .map_or(false, |relative| selected.is_match(relative))
            })
            .collect();

        // Plain byte order of the whole path: "a-b/x.js" < "a.js" < "a/z.js"
        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        files.dedup();
        debug!("Walked {} files under {}", files.len(), root.display());
        Ok(files)
    }

    fn entries(&self, root: &Path) -> Vec<PathBuf> {
        let ignore = self.ignore.clone();
        let prune_root = root.to_path_buf();

        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .filter_entry(move |entry| {
                let Ok(relative) = entry.path().strip_prefix(&prune_root) else {
                    return true;
                };
                if relative.as_os_str().is_empty() {
                    return true;
                }
                let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
                if is_dir {
                    // A directory is pruned when anything inside it would be ignored
                    !ignore.is_match(relative.join("__probe__"))
                } else {
                    !ignore.is_match(relative)
                }
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().map_or(false, |ft| ft.is_file()) {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => warn!("⚠️ Skipping unreadable path: {}", e),
            }
        }
        files
    }
}
