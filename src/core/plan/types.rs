use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::core::report::RiskLevel;

/// Summary used when there is nothing to migrate
pub const NO_MIGRATION_SUMMARY: &str =
    "No migration issues detected. The codebase appears ready or no matching patterns found.";

/// Per-step effort
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// Effort of touching `files` files: >5 high, >2 medium
    pub fn for_file_count(files: usize) -> Self {
        if files > 5 {
            Effort::High
        } else if files > 2 {
            Effort::Medium
        } else {
            Effort::Low
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Effort::Low => "low",
            Effort::Medium => "medium",
            Effort::High => "high",
        };
        f.write_str(label)
    }
}

/// Coarse whole-plan estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EffortEstimate {
    Minimal,
    Small,
    Medium,
    Large,
}

impl fmt::Display for EffortEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EffortEstimate::Minimal => "Minimal (hours)",
            EffortEstimate::Small => "Small (1-2 days)",
            EffortEstimate::Medium => "Medium (days)",
            EffortEstimate::Large => "Large (weeks)",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    pub title: String,
    pub description: String,
    pub affected_files: Vec<String>,
    pub effort: Effort,
}

impl PlanStep {
    pub fn new(title: impl Into<String>, description: impl Into<String>, effort: Effort) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            affected_files: Vec::new(),
            effort,
        }
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.affected_files = files;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Phase {
    pub name: String,
    /// 1-based position in the plan
    pub order: usize,
    pub description: String,
    pub steps: Vec<PlanStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationPlan {
    pub profile_id: String,
    pub project_path: PathBuf,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub phases: Vec<Phase>,
    pub total_files: usize,
    pub estimated_effort: EffortEstimate,
    pub generated_at: DateTime<Utc>,
}

impl MigrationPlan {
    /// Empty-phase plan for a project with nothing to migrate
    pub fn no_migration_needed(profile_id: impl Into<String>, project_path: PathBuf) -> Self {
        Self {
            profile_id: profile_id.into(),
            project_path,
            risk_level: RiskLevel::Low,
            summary: NO_MIGRATION_SUMMARY.to_string(),
            phases: Vec::new(),
            total_files: 0,
            estimated_effort: EffortEstimate::Minimal,
            generated_at: Utc::now(),
        }
    }
}

/// Accumulates phases and numbers them in insertion order
#[derive(Debug, Default)]
pub(crate) struct PhaseList {
    phases: Vec<Phase>,
}

impl PhaseList {
    pub(crate) fn push(&mut self, name: impl Into<String>, description: impl Into<String>, steps: Vec<PlanStep>) {
        let order = self.phases.len() + 1;
        self.phases.push(Phase {
            name: name.into(),
            order,
            description: description.into(),
            steps,
        });
    }

    pub(crate) fn into_phases(self) -> Vec<Phase> {
        self.phases
    }
}

/// Cleanup steps used when a catalog provides none
pub(crate) fn default_cleanup_steps() -> Vec<PlanStep> {
    vec![
        PlanStep::new(
            "Run full test suite",
            "Execute all tests and fix any remaining failures.",
            Effort::Medium,
        ),
        PlanStep::new(
            "Production build verification",
            "Verify production build completes without errors.",
            Effort::Low,
        ),
    ]
}

pub(crate) fn create_branch_step() -> PlanStep {
    PlanStep::new(
        "Create migration branch",
        "Create a dedicated branch for the migration work.",
        Effort::Low,
    )
}
