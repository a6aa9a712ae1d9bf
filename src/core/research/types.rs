use serde::{Deserialize, Serialize};

/// Outcome of one research query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchEntry {
    pub label: String,
    pub url: String,
    pub content: String,
    /// Profile keywords found in `content`
    pub keywords: Vec<String>,
}

/// Settled outcome of all research queries for one profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchResult {
    pub profile_id: String,
    pub entries: Vec<ResearchEntry>,
    pub errors: Vec<String>,
}

impl ResearchResult {
    pub fn empty(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            ..Default::default()
        }
    }
}

/// Keywords whose lower-case form occurs in the lower-cased content, in keyword order
pub fn extract_keywords(content: &str, keywords: &[String]) -> Vec<String> {
    let lower = content.to_lowercase();
    let mut matched: Vec<String> = Vec::new();

    for term in keywords {
        if lower.contains(&term.to_lowercase()) && !matched.contains(term) {
            matched.push(term.clone());
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_case_insensitive_in_order() {
        let keywords = vec![
            "querySelector".to_string(),
            "fetch".to_string(),
            "jquery".to_string(),
            "fetch".to_string(),
            "classList".to_string(),
        ];
        let content = "Replace jQuery AJAX with FETCH and use queryselector everywhere.";

        assert_eq!(
            extract_keywords(content, &keywords),
            vec!["querySelector", "fetch", "jquery"]
        );
    }

    #[test]
    fn test_extract_keywords_empty_content() {
        assert!(extract_keywords("", &["jquery".to_string()]).is_empty());
    }
}
