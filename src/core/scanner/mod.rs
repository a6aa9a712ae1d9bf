//! Local scanning: file enumeration, per-line rule matching, manifest
//! analysis and the aggregation of all three into a scan result.

mod aggregator;
mod dependency_analyzer;
mod difficulty;
mod inventory;
mod pattern_matcher;
mod walker;

pub use aggregator::{canonical_project_root, fingerprint, ScanAggregator};
pub use dependency_analyzer::{analyze_dependencies, Manifest};
pub use difficulty::{classify_difficulty, difficulty_score};
pub use inventory::{find_manifests, FileInventory, MANIFEST_FILES, NO_EXTENSION};
pub use pattern_matcher::{match_content, match_file, CompiledRule, RuleSet};
pub use walker::{compile_glob, FileWalker, DEFAULT_IGNORE_PATTERNS};
