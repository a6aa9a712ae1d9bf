use chrono::Utc;

use super::types::{
    create_branch_step, default_cleanup_steps, Effort, EffortEstimate, MigrationPlan, PhaseList,
    PlanStep,
};
use crate::core::report::MigrationReport;
use crate::core::scanner::FileInventory;

/// Plan for a migration without a rule catalog, driven by the file inventory
pub fn build_adhoc_plan(
    report: &MigrationReport,
    inventory: &FileInventory,
    source: &str,
    target: &str,
) -> MigrationPlan {
    if inventory.is_empty() {
        return MigrationPlan::no_migration_needed(
            report.profile_id.clone(),
            report.project_path.clone(),
        );
    }

    let mut phases = PhaseList::default();

    phases.push(
        "Preparation",
        format!("Set up tooling and prepare for {} to {} migration", source, target),
        vec![
            create_branch_step(),
            PlanStep::new(
                "Review research findings",
                format!(
                    "Review the gathered migration research to understand key differences \
                     between {} and {}, breaking changes, and recommended approaches.",
                    source, target
                ),
                Effort::Low,
            ),
        ],
    );

    if !inventory.manifests.is_empty() {
        let steps = inventory
            .manifests
            .iter()
            .map(|manifest| {
                let name = manifest
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| manifest.display().to_string());
                PlanStep::new(
                    format!("Update {}", name),
                    format!(
                        "Review and update dependencies in {} for {} compatibility.",
                        name, target
                    ),
                    Effort::Medium,
                )
                .with_files(vec![manifest.display().to_string()])
            })
            .collect();
        phases.push(
            "Tooling & Dependencies",
            format!("Update project dependencies and build tooling for {}", target),
            steps,
        );
    }

    let extensions = inventory.extensions_by_count();
    if !extensions.is_empty() {
        let steps = extensions
            .into_iter()
            .map(|(ext, count)| {
                PlanStep::new(
                    format!("Migrate {} files ({})", ext, count),
                    format!(
                        "Update {} {} file(s) from {} patterns to {} equivalents.",
                        count, ext, source, target
                    ),
                    extension_effort(count),
                )
            })
            .collect();
        phases.push(
            "Code Migration",
            format!("Migrate source files from {} to {}", source, target),
            steps,
        );
    }

    phases.push(
        "Cleanup & Validation",
        "Final cleanup and verification",
        default_cleanup_steps(),
    );

    MigrationPlan {
        profile_id: report.profile_id.clone(),
        project_path: report.project_path.clone(),
        risk_level: report.risk_level,
        summary: report.summary.clone(),
        phases: phases.into_phases(),
        total_files: inventory.total_files,
        estimated_effort: estimate_adhoc_effort(inventory.total_files),
        generated_at: Utc::now(),
    }
}

fn extension_effort(count: usize) -> Effort {
    if count > 20 {
        Effort::High
    } else if count > 5 {
        Effort::Medium
    } else {
        Effort::Low
    }
}

pub fn estimate_adhoc_effort(total_files: usize) -> EffortEstimate {
    match total_files {
        n if n > 200 => EffortEstimate::Large,
        n if n > 50 => EffortEstimate::Medium,
        n if n > 10 => EffortEstimate::Small,
        _ => EffortEstimate::Minimal,
    }
}
