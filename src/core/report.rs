use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use super::findings::{DependencyIssue, PatternHit, ScanResult};
use super::research::ResearchEntry;
use super::scanner::FileInventory;

/// Project-wide migration risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One representative hit per rule with the research that mentions it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelatedIssue {
    pub pattern: PatternHit,
    pub related_research: Vec<ResearchEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSummary {
    pub sources_consulted: Vec<SourceRef>,
    pub key_insights: Vec<String>,
    pub errors: Vec<String>,
}

/// Scan, research, correlation and risk for one project and profile
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub profile_id: String,
    pub project_path: PathBuf,
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub summary: String,
    pub correlated_issues: Vec<CorrelatedIssue>,
    pub dependency_issues: Vec<DependencyIssue>,
    pub scan_result: ScanResult,
    /// True when at least one research query succeeded
    pub research_available: bool,
    pub research_summary: ResearchSummary,
    /// Present for ad-hoc reports, which have no rule catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<FileInventory>,
    pub generated_at: DateTime<Utc>,
}
