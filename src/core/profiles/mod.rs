//! Migration profiles: the rule catalogs, the registry that looks them up,
//! and research-driven profiles for migrations without a catalog.

mod adhoc;
mod registry;
mod types;

pub use adhoc::{
    build_deep_research_prompt, build_discovery_prompt, build_keywords, build_search_url,
    generate_adhoc_profile, infer_file_glob, parse_discovered_urls, AdHocRequest,
    DEFAULT_SOURCE_GLOB, MAX_DISCOVERED_URLS,
};
pub use registry::ProfileRegistry;
pub use types::{
    DependencyRule, MigrationProfile, PatternRule, PhaseTemplate, ResearchQuery, StepTemplate,
};
