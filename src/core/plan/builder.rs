use chrono::Utc;
use std::collections::BTreeSet;
use tracing::info;

use super::types::{
    create_branch_step, default_cleanup_steps, Effort, EffortEstimate, MigrationPlan, PhaseList,
    PlanStep,
};
use crate::core::findings::{ScanResult, Severity};
use crate::core::profiles::{MigrationProfile, StepTemplate};
use crate::core::report::MigrationReport;

/// Files touched by each hit category, categories in first-seen order
type CategoryFiles = Vec<(String, BTreeSet<String>)>;

/// Turns a [`MigrationReport`] into an ordered, phased [`MigrationPlan`].
///
/// Without a profile the plan falls back to generic preparation and cleanup
/// steps and a single "Code Changes" phase covering every observed category.
pub struct PlanBuilder<'a> {
    profile: Option<&'a MigrationProfile>,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(profile: Option<&'a MigrationProfile>) -> Self {
        Self { profile }
    }

    pub fn build(&self, report: &MigrationReport) -> MigrationPlan {
        let scan = &report.scan_result;
        if scan.stats.total_hits == 0 && report.dependency_issues.is_empty() {
            info!("📭 Nothing to migrate for {}", report.profile_id);
            return MigrationPlan::no_migration_needed(
                report.profile_id.clone(),
                report.project_path.clone(),
            );
        }

        let by_category = group_files_by_category(scan);
        let mut phases = PhaseList::default();

        self.push_preparation(&mut phases, scan);

        if !report.dependency_issues.is_empty() {
            let steps = report
                .dependency_issues
                .iter()
                .map(|issue| {
                    let effort = if issue.severity == Severity::Breaking {
                        Effort::High
                    } else {
                        Effort::Medium
                    };
                    PlanStep::new(format!("Upgrade {}", issue.name), issue.message.clone(), effort)
                        .with_files(vec!["package.json".to_string()])
                })
                .collect();
            phases.push(
                "Dependency Upgrades",
                "Upgrade dependencies to compatible versions",
                steps,
            );
        }

        match self.profile.filter(|p| !p.phase_templates.is_empty()) {
            Some(profile) => {
                for template in &profile.phase_templates {
                    let steps = category_steps(&by_category, &template.categories);
                    if !steps.is_empty() {
                        phases.push(template.name.clone(), template.description.clone(), steps);
                    }
                }
            }
            None => {
                let all: Vec<String> = by_category.iter().map(|(c, _)| c.clone()).collect();
                let steps = category_steps(&by_category, &all);
                if !steps.is_empty() {
                    phases.push("Code Changes", "Update code patterns for the migration", steps);
                }
            }
        }

        self.push_cleanup(&mut phases);

        let total_files: BTreeSet<_> = scan.files.iter().map(|f| &f.file).collect();
        let plan = MigrationPlan {
            profile_id: report.profile_id.clone(),
            project_path: report.project_path.clone(),
            risk_level: report.risk_level,
            summary: report.summary.clone(),
            phases: phases.into_phases(),
            total_files: total_files.len(),
            estimated_effort: estimate_effort(report),
            generated_at: Utc::now(),
        };

        info!(
            "🗺️ Plan for {}: {} phases, {} files, {}",
            plan.profile_id,
            plan.phases.len(),
            plan.total_files,
            plan.estimated_effort
        );
        plan
    }

    fn push_preparation(&self, phases: &mut PhaseList, scan: &ScanResult) {
        match self.profile.filter(|p| !p.preparation_steps.is_empty()) {
            Some(profile) => {
                let steps = profile
                    .preparation_steps
                    .iter()
                    .map(|template| {
                        let files = if template.affected_files.is_empty() {
                            config_files(scan, &profile.config_file_patterns)
                        } else {
                            template.affected_files.clone()
                        };
                        step_from_template(template).with_files(files)
                    })
                    .collect();
                phases.push("Preparation", "Set up tooling and prepare for migration", steps);
            }
            None => phases.push(
                "Preparation",
                "Set up tooling and create a migration branch",
                vec![create_branch_step()],
            ),
        }
    }

    fn push_cleanup(&self, phases: &mut PhaseList) {
        match self.profile.filter(|p| !p.cleanup_steps.is_empty()) {
            Some(profile) => phases.push(
                "Cleanup & Validation",
                "Final cleanup and verification",
                profile.cleanup_steps.iter().map(step_from_template).collect(),
            ),
            None => phases.push(
                "Cleanup & Validation",
                "Run full test suite and verify production build",
                default_cleanup_steps(),
            ),
        }
    }
}

/// Coarse bucket from hit, file and dependency counts
pub fn estimate_effort(report: &MigrationReport) -> EffortEstimate {
    let stats = &report.scan_result.stats;
    let dependencies = report.dependency_issues.len();

    if stats.total_hits > 100 || stats.files_with_issues > 50 {
        EffortEstimate::Large
    } else if stats.total_hits > 30 || stats.files_with_issues > 15 {
        EffortEstimate::Medium
    } else if stats.total_hits > 10 || dependencies > 3 {
        EffortEstimate::Small
    } else {
        EffortEstimate::Minimal
    }
}

fn step_from_template(template: &StepTemplate) -> PlanStep {
    PlanStep::new(template.title.clone(), template.description.clone(), template.effort)
        .with_files(template.affected_files.clone())
}

fn group_files_by_category(scan: &ScanResult) -> CategoryFiles {
    let mut groups: CategoryFiles = Vec::new();
    for file in &scan.files {
        let path = scan.relative_path(&file.file);
        for hit in &file.hits {
            match groups.iter_mut().find(|(category, _)| *category == hit.category) {
                Some((_, files)) => {
                    files.insert(path.clone());
                }
                None => groups.push((hit.category.clone(), BTreeSet::from([path.clone()]))),
            }
        }
    }
    groups
}

/// One step per category that has files, in the order given
fn category_steps(by_category: &CategoryFiles, categories: &[String]) -> Vec<PlanStep> {
    categories
        .iter()
        .filter_map(|category| {
            let (_, files) = by_category.iter().find(|(c, _)| c == category)?;
            Some(
                PlanStep::new(
                    format!("Fix {} issues", category),
                    format!("Update {} file(s) with {} migration issues.", files.len(), category),
                    Effort::for_file_count(files.len()),
                )
                .with_files(files.iter().cloned().collect()),
            )
        })
        .collect()
}

/// Scanned files whose path mentions one of the profile's config patterns
fn config_files(scan: &ScanResult, patterns: &[String]) -> Vec<String> {
    scan.files
        .iter()
        .map(|f| scan.relative_path(&f.file))
        .filter(|path| patterns.iter().any(|p| path.contains(p.as_str())))
        .collect()
}
