use futures::stream::{self, StreamExt};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::dependency_analyzer::{analyze_dependencies, Manifest};
use super::difficulty::classify_difficulty;
use super::pattern_matcher::{match_file, RuleSet};
use super::walker::FileWalker;
use crate::config::ProjectConfig;
use crate::core::findings::{
    DependencyIssue, FileMatch, ScanResult, ScanStats, UnreadableFile,
};
use crate::core::profiles::MigrationProfile;
use crate::error::{Result, StackshiftError};

/// Runs walker, matcher and dependency analysis into one [`ScanResult`]
#[derive(Debug, Clone)]
pub struct ScanAggregator {
    walker: FileWalker,
    strict_reads: bool,
    concurrency: usize,
}

impl ScanAggregator {
    pub fn new(config: &ProjectConfig) -> Result<Self> {
        Ok(Self {
            walker: FileWalker::new(&config.ignore_patterns)?,
            strict_reads: config.strict_reads,
            concurrency: config.match_concurrency.max(1),
        })
    }

    pub fn walker(&self) -> &FileWalker {
        &self.walker
    }

    pub async fn scan(&self, project: &Path, profile: &MigrationProfile) -> Result<ScanResult> {
        let root = canonical_project_root(project).await?;
        let rules = RuleSet::compile(&profile.pattern_rules)?;
        let files = self.walker.walk_all(&root, &rules.globs())?;

        info!(
            "🔍 Scanning {} files under {} with profile {}",
            files.len(),
            root.display(),
            profile.id
        );

        // Files are matched concurrently but results keep walk order
        let matching = stream::iter(files.iter())
            .map(|file| {
                let relative = file.strip_prefix(&root).unwrap_or(file);
                let rules = &rules;
                async move { (file, match_file(file, relative, rules).await) }
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>();

        let (outcomes, manifest) = tokio::join!(matching, Manifest::load(&root));

        let mut file_matches = Vec::new();
        let mut unreadable_files = Vec::new();
        for (file, outcome) in outcomes {
            match outcome {
                Ok(hits) if hits.is_empty() => {}
                Ok(hits) => file_matches.push(FileMatch {
                    file: file.clone(),
                    difficulty: classify_difficulty(&hits),
                    hits,
                }),
                Err(e) if self.strict_reads => return Err(e),
                Err(e) => {
                    warn!("⚠️ {}", e);
                    unreadable_files.push(UnreadableFile {
                        file: file.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let dependency_issues = analyze_dependencies(manifest.as_ref(), &profile.dependency_rules);
        let stats = ScanStats::from_matches(files.len(), &file_matches);
        let fingerprint = fingerprint(&file_matches, &dependency_issues);

        info!(
            "✅ Scan complete: {} hits in {} of {} files, {} dependency issues",
            stats.total_hits,
            stats.files_with_issues,
            stats.total_files,
            dependency_issues.len()
        );

        Ok(ScanResult {
            profile_id: profile.id.clone(),
            project_path: root,
            files: file_matches,
            dependency_issues,
            stats,
            unreadable_files,
            fingerprint,
        })
    }
}

/// Absolute, symlink-resolved project root; fails unless it is a directory
pub async fn canonical_project_root(project: &Path) -> Result<PathBuf> {
    let root = tokio::fs::canonicalize(project)
        .await
        .map_err(|_| StackshiftError::ProjectPath(project.to_path_buf()))?;

    let metadata = tokio::fs::metadata(&root)
        .await
        .map_err(|_| StackshiftError::ProjectPath(project.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(StackshiftError::ProjectPath(project.to_path_buf()));
    }

    Ok(root)
}

/// SHA-256 over the ordered hits and dependency issues
pub fn fingerprint(files: &[FileMatch], dependency_issues: &[DependencyIssue]) -> String {
    let mut hasher = Sha256::new();

    for hit in files.iter().flat_map(|f| f.hits.iter()) {
        hasher.update(hit.file.to_string_lossy().as_bytes());
        hasher.update(b"\0");
        hasher.update(hit.line.to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(hit.rule.as_bytes());
        hasher.update(b"\0");
        hasher.update(hit.matched.as_bytes());
        hasher.update(b"\n");
    }

    for issue in dependency_issues {
        hasher.update(b"dependency\0");
        hasher.update(issue.name.as_bytes());
        hasher.update(b"\0");
        hasher.update(issue.current_version.as_bytes());
        hasher.update(b"\0");
        hasher.update(issue.severity.as_str().as_bytes());
        hasher.update(b"\n");
    }

    format!("{:x}", hasher.finalize())
}
