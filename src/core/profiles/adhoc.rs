use regex::Regex;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{info, warn};

use super::types::{MigrationProfile, ResearchQuery};
use crate::core::research::ResearchRunner;

/// Maximum number of documentation URLs taken from discovery
pub const MAX_DISCOVERED_URLS: usize = 5;

/// Fallback glob when nothing is known about the source technology
pub const DEFAULT_SOURCE_GLOB: &str = "**/*.{js,ts,jsx,tsx,py,java,rb,go,rs,php,cs}";

const DISCOVERY_LABEL: &str = "URL Discovery";

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s"'<>,)}\]]+"#).expect("valid URL regex"));

/// First bracketed run, non-greedy so prose after the array is left alone
static JSON_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[\s\S]*?\]").expect("valid array regex"));

/// Technology names mapped to the files they live in. Checked in order, so
/// names that contain other names come first (javascript before java).
const TECHNOLOGY_GLOBS: &[(&str, &str)] = &[
    ("typescript", "**/*.{ts,tsx}"),
    ("javascript", "**/*.{js,jsx}"),
    ("kotlin", "**/*.kt"),
    ("java", "**/*.java"),
    ("python", "**/*.py"),
    ("flask", "**/*.py"),
    ("django", "**/*.py"),
    ("ruby", "**/*.rb"),
    ("rails", "**/*.rb"),
    ("laravel", "**/*.php"),
    ("php", "**/*.php"),
    ("golang", "**/*.go"),
    ("go", "**/*.go"),
    ("rust", "**/*.rs"),
    ("swift", "**/*.swift"),
    ("c#", "**/*.cs"),
    ("csharp", "**/*.cs"),
    (".net", "**/*.cs"),
    ("dotnet", "**/*.cs"),
    ("react", "**/*.{jsx,tsx,js,ts}"),
    ("vue", "**/*.{vue,js,ts}"),
    ("angular", "**/*.{ts,html}"),
    ("svelte", "**/*.{svelte,js,ts}"),
    ("express", "**/*.{js,ts}"),
    ("fastify", "**/*.{js,ts}"),
    ("nuxt", "**/*.{vue,js,ts}"),
    ("next", "**/*.{js,jsx,ts,tsx}"),
    ("webpack", "**/*.{js,ts,json}"),
    ("vite", "**/*.{js,ts,json}"),
    ("mysql", "**/*.sql"),
    ("postgresql", "**/*.sql"),
    ("postgres", "**/*.sql"),
    ("mongodb", "**/*.{js,ts}"),
    ("sqlite", "**/*.sql"),
    ("tailwind", "**/*.{css,html,jsx,tsx,vue}"),
    ("sass", "**/*.{scss,sass}"),
    ("less", "**/*.less"),
    ("css", "**/*.css"),
];

/// A migration between two freely named technologies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdHocRequest {
    pub source: String,
    pub target: String,
    /// Extra guidance appended to every deep-research prompt
    pub context: Option<String>,
    /// Extensions to inventory (`.java` or `java`); inferred from `source` when empty
    pub file_extensions: Vec<String>,
}

impl AdHocRequest {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Default::default()
        }
    }

    /// `adhoc-<source>-to-<target>`, lower-cased with whitespace runs as `-`
    pub fn profile_id(&self) -> String {
        format!("adhoc-{}-to-{}", slug(&self.source), slug(&self.target))
    }

    pub fn file_glob(&self) -> String {
        infer_file_glob(&self.source, &self.file_extensions)
    }
}

fn slug(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// Search page the discovery query visits
pub fn build_search_url(source: &str, target: &str) -> String {
    let query = format!("{} to {} migration guide", source, target);
    match Url::parse_with_params("https://duckduckgo.com/", &[("q", query.as_str())]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("https://duckduckgo.com/?q={}", query.replace(' ', "+")),
    }
}

pub fn build_discovery_prompt(source: &str, target: &str) -> String {
    format!(
        "You are looking at search results for \"{source} to {target} migration guide\". \
         Extract the top 5 most relevant documentation URLs from the search results. \
         Focus on official migration guides, documentation pages, and well-known tutorial sites. \
         Skip ads, forums, and generic aggregator pages. \
         Return ONLY a JSON array of URL strings, like: [\"https://example.com/guide\", \"https://docs.example.com/migrate\"]. \
         If fewer than 5 relevant URLs are found, return as many as you can find."
    )
}

pub fn build_deep_research_prompt(source: &str, target: &str) -> String {
    format!(
        "Extract all migration guidance from this page relevant to migrating from {source} to {target}. \
         Include: key differences between the two, step-by-step migration instructions, \
         common pitfalls, breaking changes, equivalent APIs/patterns, and any tools that help automate the migration. \
         Be thorough and specific. Include code examples if present on the page."
    )
}

fn is_search_engine(url: &str) -> bool {
    url.contains("duckduckgo.com") || url.contains("google.com/search")
}

/// Documentation URLs from the discovery response: the first JSON array of
/// http(s) strings if it yields any, otherwise every URL-looking token.
pub fn parse_discovered_urls(response: &str) -> Vec<String> {
    if let Some(urls) = parse_json_urls(response) {
        return urls;
    }

    let mut found: Vec<String> = Vec::new();
    for candidate in URL_RE.find_iter(response) {
        let clean = candidate
            .as_str()
            .trim_end_matches(|c: char| matches!(c, '.' | ',' | ':' | ';'));
        if !is_search_engine(clean) && !found.iter().any(|u| u == clean) {
            found.push(clean.to_string());
        }
    }

    found.truncate(MAX_DISCOVERED_URLS);
    found
}

fn parse_json_urls(response: &str) -> Option<Vec<String>> {
    let candidate = JSON_ARRAY_RE.find(response)?;
    let items: Vec<Value> = serde_json::from_str(candidate.as_str()).ok()?;

    let urls: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
        .filter(|url| !is_search_engine(url))
        .take(MAX_DISCOVERED_URLS)
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        None
    } else {
        Some(urls)
    }
}

/// Glob for the files an ad-hoc migration touches
pub fn infer_file_glob(source: &str, file_extensions: &[String]) -> String {
    let extensions: Vec<&str> = file_extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .collect();
    match extensions.as_slice() {
        [] => {}
        [single] => return format!("**/*.{}", single),
        many => return format!("**/*.{{{}}}", many.join(",")),
    }

    let lower = source.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| c.is_whitespace() || matches!(c, '/' | '-' | ',' | '(' | ')'))
        .filter(|w| !w.is_empty())
        .collect();

    TECHNOLOGY_GLOBS
        .iter()
        .find(|(name, _)| {
            // Very short names would match inside unrelated words ("go" in "django")
            if name.len() <= 3 {
                words.contains(name)
            } else {
                lower.contains(name)
            }
        })
        .map(|(_, glob)| glob.to_string())
        .unwrap_or_else(|| DEFAULT_SOURCE_GLOB.to_string())
}

/// Research keywords for an ad-hoc migration
pub fn build_keywords(source: &str, target: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    let mut add = |keyword: String| {
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    };

    add(source.to_lowercase());
    add(target.to_lowercase());

    for name in [source, target] {
        for word in name.split(|c: char| c.is_whitespace() || matches!(c, '.' | '/' | '-')) {
            if word.chars().count() > 2 {
                add(word.to_lowercase());
            }
        }
    }

    for term in ["migration", "breaking change", "deprecated", "upgrade", "compatibility"] {
        add(term.to_string());
    }

    keywords
}

/// Build a research-driven profile for a migration with no built-in catalog.
///
/// A discovery query asks the research provider for documentation URLs; each
/// discovered URL becomes a deep-research query. Discovery failure leaves the
/// profile without queries; its errors are returned alongside the profile.
pub async fn generate_adhoc_profile(
    runner: &ResearchRunner<'_>,
    request: &AdHocRequest,
) -> (MigrationProfile, Vec<String>) {
    let source = request.source.trim();
    let target = request.target.trim();

    let mut profile = MigrationProfile::bare(
        request.profile_id(),
        format!("{} to {}", source, target),
        format!(
            "Ad-hoc migration profile for {} to {}, built from discovered documentation.",
            source, target
        ),
    );
    profile.research_keywords = build_keywords(source, target);

    let discovery = ResearchQuery {
        label: DISCOVERY_LABEL.to_string(),
        url: build_search_url(source, target),
        prompt: build_discovery_prompt(source, target),
    };
    let outcome = runner.run(&profile.id, &[discovery], &[]).await;

    let urls = match outcome.entries.first() {
        Some(entry) => parse_discovered_urls(&entry.content),
        None => {
            for error in &outcome.errors {
                warn!("⚠️ Documentation discovery failed: {}", error);
            }
            Vec::new()
        }
    };
    info!("🌐 Discovered {} documentation sources for {}", urls.len(), profile.id);

    let mut prompt = build_deep_research_prompt(source, target);
    if let Some(context) = request.context.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str("\n\nAdditional context from user: ");
        prompt.push_str(context);
    }

    profile.research_queries = urls
        .into_iter()
        .enumerate()
        .map(|(index, url)| ResearchQuery {
            label: format!("{} to {} Guide #{}", source, target, index + 1),
            url,
            prompt: prompt.clone(),
        })
        .collect();

    (profile, outcome.errors)
}
