use crate::core::findings::{DependencyIssue, ScanStats, Severity};
use crate::core::report::RiskLevel;
use crate::core::research::ResearchResult;
use crate::core::scanner::FileInventory;

pub const CRITICAL_RISK_SCORE: f64 = 50.0;
pub const HIGH_RISK_SCORE: f64 = 20.0;
pub const MEDIUM_RISK_SCORE: f64 = 8.0;

/// Research phrases that raise ad-hoc risk, with their weights
const RESEARCH_TRIGGERS: &[(&str, f64)] = &[
    ("breaking change", 5.0),
    ("incompatible", 3.0),
    ("deprecated", 2.0),
];

/// Project-wide score from hit counts by severity plus dependency issues
pub fn compute_risk(stats: &ScanStats, dependency_issues: &[DependencyIssue]) -> f64 {
    let hits = stats.breaking_changes as f64 * Severity::Breaking.weight()
        + stats.deprecations as f64 * Severity::Deprecated.weight()
        + stats.warnings as f64 * Severity::Warning.weight();

    let dependencies: f64 = dependency_issues
        .iter()
        .map(|issue| issue.severity.dependency_weight())
        .sum();

    hits + dependencies
}

pub fn risk_level(score: f64) -> RiskLevel {
    if score >= CRITICAL_RISK_SCORE {
        RiskLevel::Critical
    } else if score >= HIGH_RISK_SCORE {
        RiskLevel::High
    } else if score >= MEDIUM_RISK_SCORE {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Score for a migration without rules: project size plus warning phrases
/// found in the research
pub fn estimate_adhoc_risk(inventory: &FileInventory, research: &ResearchResult) -> f64 {
    let size = match inventory.total_files {
        n if n > 500 => 15.0,
        n if n > 100 => 8.0,
        n if n > 20 => 3.0,
        _ => 0.0,
    };

    let research: f64 = research
        .entries
        .iter()
        .map(|entry| {
            let content = entry.content.to_lowercase();
            RESEARCH_TRIGGERS
                .iter()
                .filter(|(phrase, _)| content.contains(phrase))
                .map(|(_, weight)| weight)
                .sum::<f64>()
        })
        .sum();

    size + research
}
