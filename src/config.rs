use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::scanner::DEFAULT_IGNORE_PATTERNS;
use crate::error::{StackshiftError, Result};
use crate::output::OutputFormat;

/// Default endpoint of the web-automation agent used for research queries
pub const DEFAULT_RESEARCH_ENDPOINT: &str = "https://agent.tinyfish.ai/v1/automation/run-sse";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project scanning configuration
    pub project: ProjectConfig,

    /// External research settings
    pub research: ResearchConfig,

    /// Additional profile catalogs
    pub profiles: ProfilesConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Globs (relative to the project root) excluded from every walk
    pub ignore_patterns: Vec<String>,

    /// Abort the scan when a candidate file cannot be read as text
    pub strict_reads: bool,

    /// Number of files matched concurrently
    pub match_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Whether to run research queries at all
    pub enabled: bool,

    /// Server-sent-events endpoint of the web agent
    pub endpoint: String,

    /// API key (takes precedence over `api_key_env`)
    pub api_key: Option<String>,

    /// Environment variable consulted when `api_key` is unset
    pub api_key_env: String,

    /// Wall-clock bound for each research sub-query
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilesConfig {
    /// Directories containing extra `*.toml` profiles; same ids override built-ins
    pub extra_dirs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (text, json)
    pub format: OutputFormat,

    /// Files listed in text reports before the remainder is summarised
    pub max_listed_files: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: DEFAULT_IGNORE_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            strict_reads: false,
            match_concurrency: 16,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_RESEARCH_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: "STACKSHIFT_RESEARCH_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ResearchConfig {
    /// Resolve the API key from the config file or the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(&self.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            max_listed_files: 20,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| StackshiftError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StackshiftError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Stackshift.toml",
                    "stackshift.toml",
                    ".stackshift.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.project.match_concurrency == 0 {
            return Err(StackshiftError::Config(
                "project.match_concurrency must be at least 1".to_string(),
            ));
        }
        if self.research.timeout_secs == 0 {
            return Err(StackshiftError::Config(
                "research.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[research]
timeout_secs = 5

[output]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.research.timeout_secs, 5);
        assert!(config.research.enabled);
        assert_eq!(config.research.endpoint, DEFAULT_RESEARCH_ENDPOINT);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.output.max_listed_files, 20);
        assert!(config
            .project
            .ignore_patterns
            .contains(&"**/node_modules/**".to_string()));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Stackshift.toml");

        let mut config = Config::default();
        config.project.strict_reads = true;
        config.profiles.extra_dirs.push(PathBuf::from("catalogs"));
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert!(loaded.project.strict_reads);
        assert_eq!(loaded.profiles.extra_dirs, vec![PathBuf::from("catalogs")]);
    }

    #[test]
    fn test_rejects_unknown_output_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Stackshift.toml");
        std::fs::write(&path, "[output]\nformat = \"yaml\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, StackshiftError::Config(_)));
        assert!(err.to_string().contains("yaml"));
    }

    #[test]
    fn test_missing_explicit_path_falls_back_to_default() {
        let config = Config::load_or_default(Some("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.research.timeout_secs, 60);
    }

    #[test]
    fn test_configured_api_key_wins() {
        let research = ResearchConfig {
            api_key: Some("from-file".to_string()),
            api_key_env: "STACKSHIFT_TEST_UNSET_VARIABLE".to_string(),
            ..ResearchConfig::default()
        };
        assert_eq!(research.resolved_api_key(), Some("from-file".to_string()));

        let blank = ResearchConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "STACKSHIFT_TEST_UNSET_VARIABLE".to_string(),
            ..ResearchConfig::default()
        };
        assert_eq!(blank.resolved_api_key(), None);
    }
}
