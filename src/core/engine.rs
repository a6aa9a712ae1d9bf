use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Result, StackshiftError};
use super::analysis::{assemble_adhoc_report, assemble_report};
use super::findings::ScanResult;
use super::plan::{build_adhoc_plan, MigrationPlan, PlanBuilder};
use super::profiles::{generate_adhoc_profile, AdHocRequest, MigrationProfile, ProfileRegistry};
use super::report::MigrationReport;
use super::research::{create_provider, ResearchProvider, ResearchRunner};
use super::scanner::{canonical_project_root, FileInventory, ScanAggregator};

/// Outcome of an ad-hoc analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdHocAnalysis {
    pub source: String,
    pub target: String,
    /// Built-in profile the source/target names resolved to, if any
    pub matched_profile: Option<String>,
    pub report: MigrationReport,
    pub plan: MigrationPlan,
}

/// Main orchestration engine: scan, analyze, plan and ad-hoc analysis
pub struct Engine {
    config: Config,
    registry: ProfileRegistry,
    aggregator: ScanAggregator,
    research_provider: Option<Box<dyn ResearchProvider>>,
}

impl Engine {
    /// Create an engine from the given or discovered configuration file
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config.project);

        let registry = ProfileRegistry::load(&config.profiles.extra_dirs)?;
        info!("📚 Loaded {} migration profiles", registry.len());

        let research_provider = if config.research.enabled {
            match create_provider(&config.research) {
                Ok(provider) => {
                    info!("✅ Research enabled: {}", provider.provider_name());
                    Some(provider)
                }
                Err(e) => {
                    warn!("⚠️ Research unavailable: {}", e);
                    warn!("Continuing with local analysis only");
                    None
                }
            }
        } else {
            debug!("Research disabled");
            None
        };

        Self::with_parts(config, registry, research_provider)
    }

    /// Assemble an engine from explicit parts
    pub fn with_parts(
        config: Config,
        registry: ProfileRegistry,
        research_provider: Option<Box<dyn ResearchProvider>>,
    ) -> Result<Self> {
        let aggregator = ScanAggregator::new(&config.project)?;
        Ok(Self {
            config,
            registry,
            aggregator,
            research_provider,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    fn runner(&self) -> ResearchRunner<'_> {
        ResearchRunner::new(
            self.research_provider.as_deref(),
            Duration::from_secs(self.config.research.timeout_secs),
        )
    }

    /// Profile the project's manifest points at, if any
    pub async fn detect(&self, project: &Path) -> Result<Option<&MigrationProfile>> {
        let root = canonical_project_root(project).await?;
        Ok(self.registry.detect_for_project(&root).await)
    }

    /// Local scan only
    pub async fn scan(&self, project: &Path, profile_id: Option<&str>) -> Result<ScanResult> {
        let root = canonical_project_root(project).await?;
        let profile = self.registry.resolve(&root, profile_id).await?;
        self.aggregator.scan(&root, profile).await
    }

    /// Scan and research concurrently, then correlate and score
    pub async fn analyze(&self, project: &Path, profile_id: Option<&str>) -> Result<MigrationReport> {
        let root = canonical_project_root(project).await?;
        let profile = self.registry.resolve(&root, profile_id).await?;
        self.analyze_with(&root, profile).await
    }

    /// Fresh analysis turned into a phased plan
    pub async fn plan(&self, project: &Path, profile_id: Option<&str>) -> Result<MigrationPlan> {
        let root = canonical_project_root(project).await?;
        let profile = self.registry.resolve(&root, profile_id).await?;
        let report = self.analyze_with(&root, profile).await?;
        Ok(PlanBuilder::new(Some(profile)).build(&report))
    }

    async fn analyze_with(&self, root: &Path, profile: &MigrationProfile) -> Result<MigrationReport> {
        info!("🚀 Analyzing {} for {}", root.display(), profile.name);

        // A failed scan cancels the research still in flight
        let runner = self.runner();
        let (scan, research) = tokio::try_join!(
            self.aggregator.scan(root, profile),
            async {
                Ok::<_, StackshiftError>(
                    runner
                        .run(&profile.id, &profile.research_queries, &profile.research_keywords)
                        .await,
                )
            },
        )?;

        Ok(assemble_report(scan, &research))
    }

    /// Analysis for a migration named only by its source and target.
    ///
    /// Names matching a built-in profile's aliases run the full rule-based
    /// analysis; anything else is driven by the file inventory and research.
    pub async fn analyze_adhoc(&self, project: &Path, request: &AdHocRequest) -> Result<AdHocAnalysis> {
        let root = canonical_project_root(project).await?;

        if let Some(profile) = self.registry.match_aliases(&request.source, &request.target) {
            info!(
                "🎯 {} to {} matches built-in profile {}",
                request.source, request.target, profile.id
            );
            let report = self.analyze_with(&root, profile).await?;
            let plan = PlanBuilder::new(Some(profile)).build(&report);
            return Ok(AdHocAnalysis {
                source: request.source.clone(),
                target: request.target.clone(),
                matched_profile: Some(profile.id.clone()),
                report,
                plan,
            });
        }

        let runner = self.runner();
        let (profile, discovery_errors) = generate_adhoc_profile(&runner, request).await;
        let glob = request.file_glob();
        info!("🧭 Ad-hoc analysis {} over {}", profile.id, glob);

        let walker = self.aggregator.walker().clone();
        let inventory_root = root.clone();
        let inventory_task = async {
            tokio::task::spawn_blocking(move || {
                FileInventory::collect(&walker, &inventory_root, &glob)
            })
            .await
            .map_err(|e| StackshiftError::FileSystem(format!("inventory task failed: {}", e)))?
        };

        let (inventory, mut research) = tokio::try_join!(
            inventory_task,
            async {
                Ok::<_, StackshiftError>(
                    runner
                        .run(&profile.id, &profile.research_queries, &profile.research_keywords)
                        .await,
                )
            },
        )?;
        // Discovery ran first, so its errors lead
        let mut errors = discovery_errors;
        errors.append(&mut research.errors);
        research.errors = errors;

        let report = assemble_adhoc_report(&profile, root, inventory.clone(), &research);
        let plan = build_adhoc_plan(&report, &inventory, request.source.trim(), request.target.trim());

        Ok(AdHocAnalysis {
            source: request.source.clone(),
            target: request.target.clone(),
            matched_profile: None,
            report,
            plan,
        })
    }
}
