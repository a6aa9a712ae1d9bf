use std::collections::HashSet;

use crate::core::findings::{PatternHit, ScanResult};
use crate::core::report::CorrelatedIssue;
use crate::core::research::{ResearchEntry, ResearchResult};

/// Message words longer than this many characters count as correlation terms
const SIGNIFICANT_WORD_CHARS: usize = 4;

/// First hit of each rule, in file-then-line order
pub fn dedupe_by_rule(scan: &ScanResult) -> Vec<&PatternHit> {
    let mut seen: HashSet<&str> = HashSet::new();
    scan.hits()
        .filter(|hit| seen.insert(hit.rule.as_str()))
        .collect()
}

/// Lower-cased terms a research entry may mention: rule id, category and
/// the significant words of the message
pub fn hit_terms(hit: &PatternHit) -> Vec<String> {
    let mut terms = vec![hit.rule.to_lowercase(), hit.category.to_lowercase()];
    terms.extend(
        hit.message
            .to_lowercase()
            .split_whitespace()
            .filter(|word| word.chars().count() > SIGNIFICANT_WORD_CHARS)
            .map(str::to_string),
    );
    terms
}

/// Substring overlap between any term and the entry's content plus keywords
pub fn is_related(terms: &[String], entry: &ResearchEntry) -> bool {
    let blob = format!("{} {}", entry.content, entry.keywords.join(" ")).to_lowercase();
    terms.iter().any(|term| blob.contains(term.as_str()))
}

pub fn find_related_research(hit: &PatternHit, entries: &[ResearchEntry]) -> Vec<ResearchEntry> {
    let terms = hit_terms(hit);
    entries
        .iter()
        .filter(|entry| is_related(&terms, entry))
        .cloned()
        .collect()
}

/// One correlated issue per distinct rule
pub fn correlate_findings(scan: &ScanResult, research: &ResearchResult) -> Vec<CorrelatedIssue> {
    dedupe_by_rule(scan)
        .into_iter()
        .map(|hit| CorrelatedIssue {
            pattern: hit.clone(),
            related_research: find_related_research(hit, &research.entries),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::findings::{Difficulty, FileMatch, ScanStats, Severity};
    use std::path::PathBuf;

    fn hit(rule: &str, file: &str, line: usize) -> PatternHit {
        PatternHit {
            rule: rule.to_string(),
            category: "DOM Selection".to_string(),
            severity: Severity::Breaking,
            file: PathBuf::from(file),
            line,
            matched: "$(".to_string(),
            message: "Use the native API here.".to_string(),
        }
    }

    fn scan(files: Vec<(&str, Vec<PatternHit>)>) -> ScanResult {
        let files: Vec<FileMatch> = files
            .into_iter()
            .map(|(file, hits)| FileMatch {
                file: PathBuf::from(file),
                hits,
                difficulty: Difficulty::Low,
            })
            .collect();
        ScanResult {
            profile_id: "p".to_string(),
            project_path: PathBuf::from("/p"),
            stats: ScanStats::from_matches(files.len(), &files),
            files,
            dependency_issues: Vec::new(),
            unreadable_files: Vec::new(),
            fingerprint: String::new(),
        }
    }

    fn entry(content: &str, keywords: &[&str]) -> ResearchEntry {
        ResearchEntry {
            label: "Guide".to_string(),
            url: "https://example.com".to_string(),
            content: content.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn test_one_issue_per_rule_keeps_first_occurrence() {
        let result = scan(vec![
            ("/p/a.js", vec![hit("selector", "/p/a.js", 3), hit("selector", "/p/a.js", 9)]),
            ("/p/b.js", vec![hit("ajax", "/p/b.js", 1), hit("selector", "/p/b.js", 2)]),
        ]);

        let issues = correlate_findings(&result, &ResearchResult::empty("p"));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].pattern.rule, "selector");
        assert_eq!(issues[0].pattern.line, 3);
        assert_eq!(issues[1].pattern.rule, "ajax");
    }

    #[test]
    fn test_many_hits_of_one_rule_give_one_issue() {
        let hits: Vec<PatternHit> = (1..=50).map(|line| hit("selector", "/p/a.js", line)).collect();
        let issues = correlate_findings(&scan(vec![("/p/a.js", hits)]), &ResearchResult::empty("p"));
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_terms_include_significant_message_words() {
        let terms = hit_terms(&hit("Selector-Rule", "/p/a.js", 1));
        assert_eq!(terms, vec!["selector-rule", "dom selection", "native"]);
    }

    #[test]
    fn test_related_by_category_message_or_keywords() {
        let subject = hit("selector", "/p/a.js", 1);
        let research = ResearchResult {
            profile_id: "p".to_string(),
            entries: vec![
                entry("All about DOM selection in modern browsers.", &[]),
                entry("Prefer NATIVE methods.", &[]),
                entry("Unrelated prose.", &["selector"]),
                entry("Nothing to see.", &["fetch"]),
            ],
            errors: Vec::new(),
        };

        let related = find_related_research(&subject, &research.entries);
        assert_eq!(related.len(), 3);
        assert!(related.iter().all(|e| e.content != "Nothing to see."));
    }

    #[test]
    fn test_substring_not_token_match() {
        let subject = hit("ajax", "/p/a.js", 1);
        let terms = hit_terms(&subject);
        assert!(is_related(&terms, &entry("Replace $.ajax() calls with fetch.", &[])));
    }
}
