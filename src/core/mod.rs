pub mod analysis;
mod engine;
pub mod findings;
pub mod plan;
pub mod profiles;
pub mod report;
pub mod research;
pub mod scanner;

pub use engine::{AdHocAnalysis, Engine};
pub use findings::{
    DependencyIssue, Difficulty, FileMatch, PatternHit, ScanResult, ScanStats, Severity,
    UnreadableFile,
};
pub use plan::{Effort, EffortEstimate, MigrationPlan, Phase, PlanStep};
pub use profiles::{AdHocRequest, MigrationProfile, ProfileRegistry};
pub use report::{CorrelatedIssue, MigrationReport, ResearchSummary, RiskLevel, SourceRef};
