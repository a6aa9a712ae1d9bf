use regex::Regex;
use std::sync::LazyLock;

use crate::core::findings::ScanResult;
use crate::core::report::{ResearchSummary, RiskLevel, SourceRef};
use crate::core::research::ResearchResult;
use crate::core::scanner::FileInventory;

/// Sentences at most this long are too short to be an insight
const MIN_INSIGHT_CHARS: usize = 20;
const INSIGHT_SENTENCES: usize = 2;
const SUMMARY_EXTENSIONS: usize = 5;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"));

/// Leading sentences long enough to carry an insight
fn leading_sentences(content: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(content)
        .filter(|s| s.chars().count() > MIN_INSIGHT_CHARS)
        .take(INSIGHT_SENTENCES)
        .collect()
}

/// Sources, the leading sentences of each entry, and errors
pub fn build_research_summary(research: &ResearchResult) -> ResearchSummary {
    let mut key_insights = Vec::new();

    for entry in &research.entries {
        let sentences = leading_sentences(&entry.content);
        if !sentences.is_empty() {
            key_insights.push(format!("[{}]: {}.", entry.label, sentences.join(". ")));
        }
        if !entry.keywords.is_empty() {
            key_insights.push(format!("  Keywords found: {}", entry.keywords.join(", ")));
        }
    }

    ResearchSummary {
        sources_consulted: research
            .entries
            .iter()
            .map(|e| SourceRef {
                label: e.label.clone(),
                url: e.url.clone(),
            })
            .collect(),
        key_insights,
        errors: research.errors.clone(),
    }
}

/// Human summary of a rule-based scan
pub fn generate_summary(scan: &ScanResult, research: &ResearchResult, level: RiskLevel) -> String {
    let stats = &scan.stats;
    let mut lines = vec![format!(
        "Migration risk: {}. Scanned {} files, found {} issues in {} files.",
        level.as_str().to_uppercase(),
        stats.total_files,
        stats.total_hits,
        stats.files_with_issues
    )];

    for (label, count) in [
        ("Breaking changes", stats.breaking_changes),
        ("Deprecations", stats.deprecations),
        ("Warnings", stats.warnings),
    ] {
        if count > 0 {
            lines.push(format!("{}: {}", label, count));
        }
    }

    if !scan.dependency_issues.is_empty() {
        let names: Vec<&str> = scan.dependency_issues.iter().map(|d| d.name.as_str()).collect();
        lines.push(format!("Dependency issues: {}", names.join(", ")));
    }

    if let Some(line) = research_line(research, "local scan") {
        lines.push(line);
    }

    lines.join("\n")
}

/// Human summary of an inventory-driven analysis
pub fn build_adhoc_summary(
    profile_name: &str,
    inventory: &FileInventory,
    research: &ResearchResult,
    level: RiskLevel,
) -> String {
    let mut lines = vec![
        format!(
            "Ad-hoc migration analysis: {}. Risk: {}.",
            profile_name,
            level.as_str().to_uppercase()
        ),
        format!("Project inventory: {} source files found.", inventory.total_files),
    ];

    let extensions: Vec<String> = inventory
        .extensions_by_count()
        .into_iter()
        .take(SUMMARY_EXTENSIONS)
        .map(|(ext, count)| format!("{} ({})", ext, count))
        .collect();
    if !extensions.is_empty() {
        lines.push(format!("File types: {}", extensions.join(", ")));
    }

    if !inventory.manifests.is_empty() {
        let names: Vec<String> = inventory
            .manifests
            .iter()
            .filter_map(|m| m.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        lines.push(format!("Manifest files: {}", names.join(", ")));
    }

    if let Some(line) = research_line(research, "file inventory") {
        lines.push(line);
    }

    lines.join("\n")
}

fn research_line(research: &ResearchResult, fallback: &str) -> Option<String> {
    if !research.entries.is_empty() {
        Some(format!(
            "\nResearch: consulted {} online sources.",
            research.entries.len()
        ))
    } else if !research.errors.is_empty() {
        Some(format!(
            "\nResearch unavailable; results based on {} only.",
            fallback
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::findings::{DependencyIssue, ScanStats, Severity};
    use crate::core::research::ResearchEntry;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn entry(label: &str, content: &str, keywords: &[&str]) -> ResearchEntry {
        ResearchEntry {
            label: label.to_string(),
            url: format!("https://docs.example.com/{}", label),
            content: content.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn scan(stats: ScanStats, deps: &[&str]) -> ScanResult {
        ScanResult {
            profile_id: "p".to_string(),
            project_path: PathBuf::from("/p"),
            files: Vec::new(),
            dependency_issues: deps
                .iter()
                .map(|name| DependencyIssue {
                    name: name.to_string(),
                    current_version: "1".to_string(),
                    message: "m".to_string(),
                    severity: Severity::Breaking,
                })
                .collect(),
            stats,
            unreadable_files: Vec::new(),
            fingerprint: String::new(),
        }
    }

    #[test]
    fn test_insights_take_two_long_sentences() {
        let research = ResearchResult {
            profile_id: "p".to_string(),
            entries: vec![entry(
                "Guide",
                "Short one. The ajax helper was removed entirely! Use fetch for every request now? Last sentence is long enough too.",
                &["ajax", "fetch"],
            )],
            errors: vec!["Other: timed out after 60s".to_string()],
        };

        let summary = build_research_summary(&research);
        assert_eq!(
            summary.key_insights,
            vec![
                "[Guide]: The ajax helper was removed entirely. Use fetch for every request now.",
                "  Keywords found: ajax, fetch",
            ]
        );
        assert_eq!(summary.sources_consulted[0].url, "https://docs.example.com/Guide");
        assert_eq!(summary.errors.len(), 1);
    }

    #[test]
    fn test_no_insight_from_short_content() {
        let research = ResearchResult {
            profile_id: "p".to_string(),
            entries: vec![entry("Guide", "Too short.", &[])],
            errors: Vec::new(),
        };
        assert!(build_research_summary(&research).key_insights.is_empty());
    }

    #[test]
    fn test_summary_lists_nonzero_counts() {
        let stats = ScanStats {
            total_files: 12,
            files_with_issues: 3,
            total_hits: 5,
            breaking_changes: 4,
            deprecations: 0,
            warnings: 1,
        };
        let research = ResearchResult {
            profile_id: "p".to_string(),
            entries: Vec::new(),
            errors: vec!["x: failed".to_string()],
        };

        let summary = generate_summary(&scan(stats, &["express", "body-parser"]), &research, RiskLevel::Medium);
        assert_eq!(
            summary,
            "Migration risk: MEDIUM. Scanned 12 files, found 5 issues in 3 files.\n\
             Breaking changes: 4\n\
             Warnings: 1\n\
             Dependency issues: express, body-parser\n\
             \n\
             Research unavailable; results based on local scan only."
        );
    }

    #[test]
    fn test_summary_without_research_has_no_research_line() {
        let summary = generate_summary(
            &scan(ScanStats::default(), &[]),
            &ResearchResult::empty("p"),
            RiskLevel::Low,
        );
        assert_eq!(summary, "Migration risk: LOW. Scanned 0 files, found 0 issues in 0 files.");
    }

    #[test]
    fn test_adhoc_summary_lists_top_extensions_and_manifests() {
        let by_extension: BTreeMap<String, usize> = [
            (".a", 1),
            (".b", 7),
            (".c", 3),
            (".d", 2),
            (".e", 9),
            (".f", 4),
        ]
        .into_iter()
        .map(|(e, c)| (e.to_string(), c))
        .collect();
        let inventory = FileInventory {
            total_files: 26,
            by_extension,
            manifests: vec![PathBuf::from("/p/go.mod"), PathBuf::from("/p/Makefile")],
        };
        let research = ResearchResult {
            profile_id: "adhoc".to_string(),
            entries: vec![entry("G", "content", &[])],
            errors: Vec::new(),
        };

        let summary = build_adhoc_summary("Go to Rust", &inventory, &research, RiskLevel::High);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "Ad-hoc migration analysis: Go to Rust. Risk: HIGH.");
        assert_eq!(lines[1], "Project inventory: 26 source files found.");
        assert_eq!(lines[2], "File types: .e (9), .b (7), .f (4), .c (3), .d (2)");
        assert_eq!(lines[3], "Manifest files: go.mod, Makefile");
        assert_eq!(lines[5], "Research: consulted 1 online sources.");
    }
}
