//! Rendering of command results as JSON envelopes or text reports.

mod json;
mod text;

pub use json::{render_failure, render_success};
pub use text::{render_text_failure, TextRenderer};

use serde::{Deserialize, Serialize};

use crate::core::{MigrationProfile, ProfileRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// One line per catalog in `stackshift profiles`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pattern_rules: usize,
    pub dependency_rules: usize,
    pub research_queries: usize,
}

impl From<&MigrationProfile> for ProfileSummary {
    fn from(profile: &MigrationProfile) -> Self {
        Self {
            id: profile.id.clone(),
            name: profile.name.clone(),
            description: profile.description.clone(),
            pattern_rules: profile.pattern_rules.len(),
            dependency_rules: profile.dependency_rules.len(),
            research_queries: profile.research_queries.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileListing {
    pub profiles: Vec<ProfileSummary>,
    /// Set when detection was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected: Option<Option<String>>,
}

impl ProfileListing {
    pub fn new(registry: &ProfileRegistry) -> Self {
        Self {
            profiles: registry.profiles().map(ProfileSummary::from).collect(),
            detected: None,
        }
    }

    pub fn with_detection(mut self, detected: Option<String>) -> Self {
        self.detected = Some(detected);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_deserializes_lowercase() {
        let json: OutputFormat = serde_json::from_str(r#""json""#).unwrap();
        assert_eq!(json, OutputFormat::Json);
        assert_eq!(serde_json::to_string(&OutputFormat::Text).unwrap(), r#""text""#);
        assert!(serde_json::from_str::<OutputFormat>(r#""yaml""#).is_err());
    }

    #[test]
    fn test_listing_covers_registry() {
        let registry = ProfileRegistry::builtin().unwrap();
        let listing = ProfileListing::new(&registry).with_detection(None);
        assert_eq!(listing.profiles.len(), registry.len());

        let value = serde_json::to_value(&listing).unwrap();
        assert!(value["detected"].is_null());
        assert!(value["profiles"][0]["patternRules"].is_number());
    }
}
