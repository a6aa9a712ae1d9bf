use async_trait::async_trait;
use futures::StreamExt;
use serde_json::json;
use tracing::debug;

use super::provider::ResearchProvider;
use super::stream::SseAccumulator;
use super::types::{extract_keywords, ResearchEntry};
use crate::config::ResearchConfig;
use crate::core::profiles::ResearchQuery;
use crate::error::{Result, StackshiftError};

/// Web-automation agent that visits a URL, follows a prompt and streams
/// the extracted text back as server-sent events
pub struct WebAgentProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl WebAgentProvider {
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let api_key = config.resolved_api_key().ok_or_else(|| {
            StackshiftError::Config(format!(
                "Research API key not set (research.api_key or ${})",
                config.api_key_env
            ))
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl ResearchProvider for WebAgentProvider {
    async fn fetch(&self, query: &ResearchQuery, keywords: &[String]) -> Result<ResearchEntry> {
        debug!("Researching {} via {}", query.label, query.url);

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-Key", &self.api_key)
            .header("Accept", "text/event-stream")
            .json(&json!({
                "url": query.url,
                "prompt": query.prompt,
            }))
            .send()
            .await
            .map_err(|e| StackshiftError::Research(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(StackshiftError::Research(format!(
                "web agent error {}: {}",
                status,
                error_text.trim()
            )));
        }

        let mut body = response.bytes_stream();
        let mut accumulator = SseAccumulator::new();
        while let Some(chunk) = body.next().await {
            let chunk = chunk
                .map_err(|e| StackshiftError::Research(format!("stream interrupted: {}", e)))?;
            accumulator.push_bytes(&chunk);
        }

        let content = accumulator.finish();
        let matched = extract_keywords(&content, keywords);

        Ok(ResearchEntry {
            label: query.label.clone(),
            url: query.url.clone(),
            content,
            keywords: matched,
        })
    }

    fn provider_name(&self) -> &str {
        "web-agent"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> WebAgentProvider {
        WebAgentProvider::new(&ResearchConfig {
            endpoint: format!("{}/v1/automation/run-sse", server.uri()),
            api_key: Some("test-key".to_string()),
            ..ResearchConfig::default()
        })
        .unwrap()
    }

    fn query() -> ResearchQuery {
        ResearchQuery {
            label: "jQuery Migration Guide".to_string(),
            url: "https://example.com/jquery".to_string(),
            prompt: "List the replacements.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_decodes_sse_body() {
        let server = MockServer::start().await;
        let body = "data: {\"status\":\"RUNNING\"}\n\n\
                    data: {\"resultJson\":\"\\\"Use querySelector and fetch instead of jQuery.\\\"\"}\n\n\
                    data: [DONE]\n\n";

        Mock::given(method("POST"))
            .and(path("/v1/automation/run-sse"))
            .and(header("X-API-Key", "test-key"))
            .and(body_json(json!({
                "url": "https://example.com/jquery",
                "prompt": "List the replacements.",
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .expect(1)
            .mount(&server)
            .await;

        let keywords = vec![
            "querySelector".to_string(),
            "fetch".to_string(),
            "classList".to_string(),
        ];
        let entry = provider_for(&server).fetch(&query(), &keywords).await.unwrap();

        assert_eq!(entry.label, "jQuery Migration Guide");
        assert_eq!(entry.url, "https://example.com/jquery");
        assert_eq!(entry.content, "Use querySelector and fetch instead of jQuery.");
        assert_eq!(entry.keywords, vec!["querySelector", "fetch"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = provider_for(&server).fetch(&query(), &[]).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_empty_stream_yields_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let entry = provider_for(&server).fetch(&query(), &[]).await.unwrap();
        assert_eq!(entry.content, "No content retrieved");
        assert!(entry.keywords.is_empty());
    }
}
