//! Scan findings shared by the scanner, the analysis layer and the plan builder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How disruptive a detected pattern or dependency is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Breaking,
    Deprecated,
    Warning,
}

impl Severity {
    /// Weight of one pattern hit, shared by difficulty and risk scoring
    pub fn weight(self) -> f64 {
        match self {
            Severity::Breaking => 3.0,
            Severity::Deprecated => 1.0,
            Severity::Warning => 0.5,
        }
    }

    /// Weight of one matched dependency issue in the risk score
    pub fn dependency_weight(self) -> f64 {
        match self {
            Severity::Breaking => 2.0,
            Severity::Deprecated => 1.0,
            Severity::Warning => 0.5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Breaking => "breaking",
            Severity::Deprecated => "deprecated",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-file prioritisation label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Low,
    Medium,
    High,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Difficulty::Low => "low",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        };
        f.write_str(label)
    }
}

/// One rule match at one file/line location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternHit {
    pub rule: String,
    pub category: String,
    pub severity: Severity,
    /// Absolute path of the matched file
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    #[serde(rename = "match")]
    pub matched: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyIssue {
    pub name: String,
    pub current_version: String,
    pub message: String,
    pub severity: Severity,
}

/// A file with at least one hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMatch {
    pub file: PathBuf,
    pub hits: Vec<PatternHit>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub total_files: usize,
    pub files_with_issues: usize,
    pub total_hits: usize,
    pub breaking_changes: usize,
    pub deprecations: usize,
    pub warnings: usize,
}

impl ScanStats {
    /// Count hits by severity over the retained file matches
    pub fn from_matches(total_files: usize, files: &[FileMatch]) -> Self {
        let mut stats = ScanStats {
            total_files,
            files_with_issues: files.len(),
            ..Default::default()
        };

        for hit in files.iter().flat_map(|f| f.hits.iter()) {
            stats.total_hits += 1;
            match hit.severity {
                Severity::Breaking => stats.breaking_changes += 1,
                Severity::Deprecated => stats.deprecations += 1,
                Severity::Warning => stats.warnings += 1,
            }
        }

        stats
    }
}

/// A candidate file the matcher could not read as text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadableFile {
    pub file: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub profile_id: String,
    pub project_path: PathBuf,
    /// Files with hits, sorted by absolute path
    pub files: Vec<FileMatch>,
    pub dependency_issues: Vec<DependencyIssue>,
    pub stats: ScanStats,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unreadable_files: Vec<UnreadableFile>,
    /// SHA-256 over the ordered hits and dependency issues
    pub fingerprint: String,
}

impl ScanResult {
    /// All hits in file-then-line order
    pub fn hits(&self) -> impl Iterator<Item = &PatternHit> {
        self.files.iter().flat_map(|f| f.hits.iter())
    }

    /// Path of `file` relative to the scanned project, for display
    pub fn relative_path(&self, file: &std::path::Path) -> String {
        file.strip_prefix(&self.project_path)
            .unwrap_or(file)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(rule: &str, severity: Severity) -> PatternHit {
        PatternHit {
            rule: rule.to_string(),
            category: "Test".to_string(),
            severity,
            file: PathBuf::from("/project/src/a.js"),
            line: 1,
            matched: "$(".to_string(),
            message: "msg".to_string(),
        }
    }

    #[test]
    fn test_stats_count_by_severity() {
        let files = vec![
            FileMatch {
                file: PathBuf::from("/project/src/a.js"),
                hits: vec![hit("a", Severity::Breaking), hit("b", Severity::Warning)],
                difficulty: Difficulty::Low,
            },
            FileMatch {
                file: PathBuf::from("/project/src/b.js"),
                hits: vec![hit("c", Severity::Deprecated)],
                difficulty: Difficulty::Low,
            },
        ];

        let stats = ScanStats::from_matches(7, &files);
        assert_eq!(stats.total_files, 7);
        assert_eq!(stats.files_with_issues, 2);
        assert_eq!(stats.total_hits, 3);
        assert_eq!(stats.breaking_changes, 1);
        assert_eq!(stats.deprecations, 1);
        assert_eq!(stats.warnings, 1);
    }

    #[test]
    fn test_hit_serializes_with_match_key() {
        let value = serde_json::to_value(hit("jquery-selector", Severity::Breaking)).unwrap();
        assert_eq!(value["match"], "$(");
        assert_eq!(value["severity"], "breaking");
        assert_eq!(value["file"], "/project/src/a.js");
    }

    #[test]
    fn test_relative_path_strips_project_root() {
        let result = ScanResult {
            profile_id: "p".to_string(),
            project_path: PathBuf::from("/project"),
            files: Vec::new(),
            dependency_issues: Vec::new(),
            stats: ScanStats::default(),
            unreadable_files: Vec::new(),
            fingerprint: String::new(),
        };
        assert_eq!(
            result.relative_path(std::path::Path::new("/project/src/a.js")),
            "src/a.js"
        );
        assert_eq!(result.relative_path(std::path::Path::new("/other/b.js")), "/other/b.js");
    }
}
