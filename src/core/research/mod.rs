//! External research: a provider trait at the network seam, the web-agent
//! client behind it, and a runner that settles every query of a profile.

mod provider;
mod runner;
mod stream;
mod types;
mod web_agent;

pub use provider::{create_provider, ResearchProvider};
pub use runner::{ResearchRunner, NO_PROVIDER};
pub use stream::{SseAccumulator, EMPTY_CONTENT};
pub use types::{extract_keywords, ResearchEntry, ResearchResult};
pub use web_agent::WebAgentProvider;
