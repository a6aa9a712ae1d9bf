use fancy_regex::Regex;
use globset::GlobMatcher;
use std::path::Path;
use tracing::{debug, warn};

use super::walker::compile_glob;
use crate::core::findings::PatternHit;
use crate::core::profiles::PatternRule;
use crate::error::{Result, StackshiftError};

/// A pattern rule with its regex and applicability glob compiled
#[derive(Debug)]
pub struct CompiledRule {
    pub rule: PatternRule,
    regex: Regex,
    glob: GlobMatcher,
}

impl CompiledRule {
    pub fn applies_to(&self, relative: &Path) -> bool {
        self.glob.is_match(relative)
    }
}

/// A profile's pattern rules, compiled once per scan and kept in catalog order
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(rules: &[PatternRule]) -> Result<Self> {
        let compiled = rules
            .iter()
            .map(|rule| {
                let regex = Regex::new(&rule.pattern).map_err(|e| StackshiftError::Pattern {
                    rule: rule.id.clone(),
                    message: e.to_string(),
                })?;
                let glob = compile_glob(&rule.file_glob)?.compile_matcher();
                Ok(CompiledRule {
                    rule: rule.clone(),
                    regex,
                    glob,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rules: compiled })
    }

    /// Distinct file globs in first-seen order
    pub fn globs(&self) -> Vec<String> {
        let mut globs: Vec<String> = Vec::new();
        for compiled in &self.rules {
            if !globs.contains(&compiled.rule.file_glob) {
                globs.push(compiled.rule.file_glob.clone());
            }
        }
        globs
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Apply every rule whose glob covers `relative` to each line of `content`.
///
/// Only the first match of a rule on a line is recorded. Hits are ordered by
/// line, then by catalog order.
pub fn match_content(file: &Path, relative: &Path, content: &str, rules: &RuleSet) -> Vec<PatternHit> {
    let applicable: Vec<&CompiledRule> = rules
        .rules
        .iter()
        .filter(|compiled| compiled.applies_to(relative))
        .collect();
    if applicable.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    for (index, line) in content.lines().enumerate() {
        for compiled in &applicable {
            match compiled.regex.find(line) {
                Ok(Some(found)) => hits.push(PatternHit {
                    rule: compiled.rule.id.clone(),
                    category: compiled.rule.category.clone(),
                    severity: compiled.rule.severity,
                    file: file.to_path_buf(),
                    line: index + 1,
                    matched: found.as_str().to_string(),
                    message: compiled.rule.message.clone(),
                }),
                Ok(None) => {}
                Err(e) => warn!(
                    "⚠️ Rule {} failed on {}:{}: {}",
                    compiled.rule.id,
                    relative.display(),
                    index + 1,
                    e
                ),
            }
        }
    }

    hits
}

/// Read `file` as UTF-8 text and match it; unreadable or non-text files are an error
pub async fn match_file(file: &Path, relative: &Path, rules: &RuleSet) -> Result<Vec<PatternHit>> {
    let content = tokio::fs::read_to_string(file)
        .await
        .map_err(|source| StackshiftError::FileRead {
            path: file.to_path_buf(),
            source,
        })?;

    let hits = match_content(file, relative, &content, rules);
    debug!("{}: {} hits", relative.display(), hits.len());
    Ok(hits)
}
