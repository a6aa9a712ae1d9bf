use serde::{Deserialize, Serialize};

use crate::core::findings::Severity;
use crate::core::plan::Effort;

/// A named bundle of rules and plan templates for one migration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationProfile {
    pub id: String,
    pub name: String,
    pub description: String,

    #[serde(default)]
    pub pattern_rules: Vec<PatternRule>,

    #[serde(default)]
    pub dependency_rules: Vec<DependencyRule>,

    #[serde(default)]
    pub research_queries: Vec<ResearchQuery>,

    /// Terms looked for in research content
    #[serde(default)]
    pub research_keywords: Vec<String>,

    /// Substrings identifying configuration files, used to fill in preparation steps
    #[serde(default)]
    pub config_file_patterns: Vec<String>,

    #[serde(default)]
    pub preparation_steps: Vec<StepTemplate>,

    #[serde(default)]
    pub phase_templates: Vec<PhaseTemplate>,

    #[serde(default)]
    pub cleanup_steps: Vec<StepTemplate>,

    /// Lower-case names that identify the migration source in ad-hoc requests
    #[serde(default)]
    pub source_aliases: Vec<String>,

    /// Lower-case names that identify the migration target in ad-hoc requests
    #[serde(default)]
    pub target_aliases: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternRule {
    pub id: String,
    pub category: String,
    /// Regular expression applied to each line; lookaround is allowed
    pub pattern: String,
    /// Glob over project-relative paths selecting the files this rule applies to
    pub file_glob: String,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyRule {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_range: Option<String>,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchQuery {
    pub label: String,
    pub url: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepTemplate {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub affected_files: Vec<String>,
    pub effort: Effort,
}

/// A catalog-provided code-change phase keyed by pattern categories
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhaseTemplate {
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
}

impl MigrationProfile {
    /// An empty profile carrying only identity, used as the base for ad-hoc profiles
    pub fn bare(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            pattern_rules: Vec::new(),
            dependency_rules: Vec::new(),
            research_queries: Vec::new(),
            research_keywords: Vec::new(),
            config_file_patterns: Vec::new(),
            preparation_steps: Vec::new(),
            phase_templates: Vec::new(),
            cleanup_steps: Vec::new(),
            source_aliases: Vec::new(),
            target_aliases: Vec::new(),
        }
    }
}
