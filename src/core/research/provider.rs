use async_trait::async_trait;

use super::types::ResearchEntry;
use super::web_agent::WebAgentProvider;
use crate::config::ResearchConfig;
use crate::core::profiles::ResearchQuery;
use crate::error::{Result, StackshiftError};

/// Source of external research text for one query
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Run one query and report the keywords found in the retrieved content
    async fn fetch(&self, query: &ResearchQuery, keywords: &[String]) -> Result<ResearchEntry>;

    fn provider_name(&self) -> &str;
}

/// Factory function to create the configured research provider
pub fn create_provider(config: &ResearchConfig) -> Result<Box<dyn ResearchProvider>> {
    if !config.enabled {
        return Err(StackshiftError::Config("Research is disabled".to_string()));
    }

    Ok(Box::new(WebAgentProvider::new(config)?))
}
