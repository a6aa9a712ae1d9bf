//! Correlation of scan hits with research, risk scoring and report assembly.

mod correlator;
mod risk;
mod summary;

pub use correlator::{correlate_findings, dedupe_by_rule, find_related_research, hit_terms};
pub use risk::{
    compute_risk, estimate_adhoc_risk, risk_level, CRITICAL_RISK_SCORE, HIGH_RISK_SCORE,
    MEDIUM_RISK_SCORE,
};
pub use summary::{build_adhoc_summary, build_research_summary, generate_summary};

use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

use crate::core::findings::{ScanResult, ScanStats};
use crate::core::profiles::MigrationProfile;
use crate::core::report::MigrationReport;
use crate::core::research::ResearchResult;
use crate::core::scanner::{fingerprint, FileInventory};

/// Combine a scan and its research into a scored report
pub fn assemble_report(scan: ScanResult, research: &ResearchResult) -> MigrationReport {
    let correlated_issues = correlate_findings(&scan, research);
    let risk_score = compute_risk(&scan.stats, &scan.dependency_issues);
    let level = risk_level(risk_score);
    let summary = generate_summary(&scan, research, level);

    info!(
        "📊 {}: risk {} (score {}), {} correlated issues",
        scan.profile_id,
        level,
        risk_score,
        correlated_issues.len()
    );

    MigrationReport {
        profile_id: scan.profile_id.clone(),
        project_path: scan.project_path.clone(),
        risk_level: level,
        risk_score,
        summary,
        correlated_issues,
        dependency_issues: scan.dependency_issues.clone(),
        research_available: !research.entries.is_empty(),
        research_summary: build_research_summary(research),
        scan_result: scan,
        inventory: None,
        generated_at: Utc::now(),
    }
}

/// Report for a migration without rules; the scan section only carries the
/// inventory's file count
pub fn assemble_adhoc_report(
    profile: &MigrationProfile,
    project_path: PathBuf,
    inventory: FileInventory,
    research: &ResearchResult,
) -> MigrationReport {
    let risk_score = estimate_adhoc_risk(&inventory, research);
    let level = risk_level(risk_score);
    let summary = build_adhoc_summary(&profile.name, &inventory, research, level);

    info!(
        "📊 {}: risk {} (score {}) over {} files",
        profile.id, level, risk_score, inventory.total_files
    );

    let scan_result = ScanResult {
        profile_id: profile.id.clone(),
        project_path: project_path.clone(),
        files: Vec::new(),
        dependency_issues: Vec::new(),
        stats: ScanStats {
            total_files: inventory.total_files,
            ..ScanStats::default()
        },
        unreadable_files: Vec::new(),
        fingerprint: fingerprint(&[], &[]),
    };

    MigrationReport {
        profile_id: profile.id.clone(),
        project_path,
        risk_level: level,
        risk_score,
        summary,
        correlated_issues: Vec::new(),
        dependency_issues: Vec::new(),
        scan_result,
        research_available: !research.entries.is_empty(),
        research_summary: build_research_summary(research),
        inventory: Some(inventory),
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::findings::{DependencyIssue, Difficulty, FileMatch, PatternHit, Severity};
    use crate::core::report::RiskLevel;
    use crate::core::research::ResearchEntry;
    use std::collections::BTreeMap;

    fn scan_with(breaking_per_file: &[usize], deps: Vec<DependencyIssue>) -> ScanResult {
        let files: Vec<FileMatch> = breaking_per_file
            .iter()
            .enumerate()
            .map(|(i, count)| {
                let file = PathBuf::from(format!("/p/{}.js", i));
                FileMatch {
                    hits: (1..=*count)
                        .map(|line| PatternHit {
                            rule: "selector".to_string(),
                            category: "DOM".to_string(),
                            severity: Severity::Breaking,
                            file: file.clone(),
                            line,
                            matched: "$(".to_string(),
                            message: "Replace jQuery selectors".to_string(),
                        })
                        .collect(),
                    file,
                    difficulty: Difficulty::Low,
                }
            })
            .collect();
        ScanResult {
            profile_id: "jquery-to-vanilla".to_string(),
            project_path: PathBuf::from("/p"),
            stats: ScanStats::from_matches(files.len(), &files),
            fingerprint: fingerprint(&files, &deps),
            files,
            dependency_issues: deps,
            unreadable_files: Vec::new(),
        }
    }

    #[test]
    fn test_report_scores_and_correlates() {
        let research = ResearchResult {
            profile_id: "jquery-to-vanilla".to_string(),
            entries: vec![ResearchEntry {
                label: "Guide".to_string(),
                url: "https://example.com".to_string(),
                content: "Use querySelector instead of jQuery selectors.".to_string(),
                keywords: Vec::new(),
            }],
            errors: vec!["Other: timed out after 60s".to_string()],
        };
        let deps = vec![DependencyIssue {
            name: "jquery".to_string(),
            current_version: "3.7.1".to_string(),
            message: "Remove jQuery".to_string(),
            severity: Severity::Breaking,
        }];

        let report = assemble_report(scan_with(&[2, 1], deps), &research);

        assert_eq!(report.risk_score, 11.0);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert_eq!(report.correlated_issues.len(), 1);
        assert_eq!(report.correlated_issues[0].related_research.len(), 1);
        assert_eq!(report.dependency_issues.len(), 1);
        assert!(report.research_available);
        assert_eq!(report.research_summary.errors.len(), 1);
        assert!(report.summary.starts_with("Migration risk: MEDIUM."));
    }

    #[test]
    fn test_research_unavailable_when_every_query_failed() {
        let research = ResearchResult {
            profile_id: "p".to_string(),
            entries: Vec::new(),
            errors: vec!["a: boom".to_string(), "b: boom".to_string()],
        };
        let report = assemble_report(scan_with(&[1], Vec::new()), &research);
        assert!(!report.research_available);
        assert_eq!(report.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_adhoc_report_carries_inventory() {
        let profile = MigrationProfile::bare("adhoc-go-to-rust", "Go to Rust", "d");
        let inventory = FileInventory {
            total_files: 120,
            by_extension: BTreeMap::from([(".go".to_string(), 120)]),
            manifests: vec![PathBuf::from("/p/go.mod")],
        };

        let report = assemble_adhoc_report(
            &profile,
            PathBuf::from("/p"),
            inventory,
            &ResearchResult::empty("adhoc-go-to-rust"),
        );

        assert_eq!(report.risk_score, 8.0);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert_eq!(report.scan_result.stats.total_files, 120);
        assert!(report.scan_result.files.is_empty());
        assert_eq!(report.inventory.as_ref().map(|i| i.total_files), Some(120));
        assert!(report.summary.contains("File types: .go (120)"));
    }
}
