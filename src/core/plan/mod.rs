//! Phased migration plans built from reports.

mod adhoc;
mod builder;
mod types;

pub use adhoc::{build_adhoc_plan, estimate_adhoc_effort};
pub use builder::{estimate_effort, PlanBuilder};
pub use types::{
    Effort, EffortEstimate, MigrationPlan, Phase, PlanStep, NO_MIGRATION_SUMMARY,
};
