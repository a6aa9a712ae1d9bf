use futures::future::join_all;
use std::time::Duration;
use tracing::{info, warn};

use super::provider::ResearchProvider;
use super::types::ResearchResult;
use crate::core::profiles::ResearchQuery;

/// Error recorded when queries exist but research is unavailable
pub const NO_PROVIDER: &str = "research provider not configured";

/// Fans a profile's research queries out concurrently and settles all of them.
///
/// A failed or timed-out query is recorded as `"<label>: <reason>"` and never
/// affects its siblings.
pub struct ResearchRunner<'a> {
    provider: Option<&'a dyn ResearchProvider>,
    timeout: Duration,
}

impl<'a> ResearchRunner<'a> {
    pub fn new(provider: Option<&'a dyn ResearchProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub async fn run(
        &self,
        profile_id: &str,
        queries: &[ResearchQuery],
        keywords: &[String],
    ) -> ResearchResult {
        let mut result = ResearchResult::empty(profile_id);
        if queries.is_empty() {
            return result;
        }

        let Some(provider) = self.provider else {
            warn!("⚠️ Skipping {} research queries: {}", queries.len(), NO_PROVIDER);
            result.errors.push(NO_PROVIDER.to_string());
            return result;
        };

        info!(
            "🔎 Running {} research queries via {}",
            queries.len(),
            provider.provider_name()
        );

        let timeout = self.timeout;
        let outcomes = join_all(queries.iter().map(|query| async move {
            let outcome = tokio::time::timeout(timeout, provider.fetch(query, keywords)).await;
            (query, outcome)
        }))
        .await;

        for (query, outcome) in outcomes {
            match outcome {
                Ok(Ok(entry)) => result.entries.push(entry),
                Ok(Err(e)) => {
                    warn!("⚠️ Research query {} failed: {}", query.label, e);
                    result.errors.push(format!("{}: {}", query.label, e));
                }
                Err(_) => {
                    warn!("⚠️ Research query {} timed out", query.label);
                    result.errors.push(format!(
                        "{}: timed out after {}s",
                        query.label,
                        timeout.as_secs_f64()
                    ));
                }
            }
        }

        info!(
            "🔎 Research settled: {} succeeded, {} failed",
            result.entries.len(),
            result.errors.len()
        );
        result
    }
}
