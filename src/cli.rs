use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use crate::core::{AdHocRequest, Engine};
use crate::error::StackshiftError;
use crate::output::{
    render_failure, render_success, render_text_failure, OutputFormat, ProfileListing,
    TextRenderer,
};

#[derive(Parser)]
#[command(name = "stackshift")]
#[command(about = "The Migration Scanner That Turns Legacy Patterns Into a Phased Plan")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (defaults to output.format from the configuration)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a project for migration patterns
    Scan {
        /// Project root
        project: PathBuf,

        /// Profile id (auto-detected from the manifest when omitted)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Scan, research and score a migration
    Analyze {
        /// Project root
        project: PathBuf,

        /// Profile id (auto-detected from the manifest when omitted)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Build a phased migration plan
    Plan {
        /// Project root
        project: PathBuf,

        /// Profile id (auto-detected from the manifest when omitted)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Analyze a migration between any two technologies
    Adhoc {
        /// Project root
        project: PathBuf,

        /// Technology being migrated from
        #[arg(short, long)]
        source: String,

        /// Technology being migrated to
        #[arg(short, long)]
        target: String,

        /// Extra guidance for the research queries
        #[arg(long)]
        context: Option<String>,

        /// File extensions to inventory (repeatable)
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },

    /// List migration profiles
    Profiles {
        /// Also detect the profile for this project
        #[arg(long)]
        detect: Option<PathBuf>,
    },
}

impl Cli {
    /// Run the command and print its result; failures print an error
    /// envelope and return `Err` so the process exits non-zero
    pub async fn execute(self, engine: Engine) -> Result<()> {
        let format = self.format.unwrap_or(engine.config().output.format);
        let renderer = TextRenderer::new(engine.config().output.max_listed_files)?;

        match run(&self.command, &engine, format, &renderer).await {
            Ok(rendered) => {
                println!("{}", rendered);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                match format {
                    OutputFormat::Json => println!("{}", render_failure(&message)),
                    OutputFormat::Text => eprintln!("{}", render_text_failure(&message)),
                }
                Err(e.into())
            }
        }
    }
}

async fn run(
    command: &Commands,
    engine: &Engine,
    format: OutputFormat,
    renderer: &TextRenderer,
) -> crate::error::Result<String> {
    match command {
        Commands::Scan { project, profile } => {
            let scan = engine.scan(project, profile.as_deref()).await?;
            render(format, &scan, || renderer.scan(&scan))
        }
        Commands::Analyze { project, profile } => {
            let report = engine.analyze(project, profile.as_deref()).await?;
            render(format, &report, || renderer.report(&report))
        }
        Commands::Plan { project, profile } => {
            let plan = engine.plan(project, profile.as_deref()).await?;
            render(format, &plan, || renderer.plan(&plan))
        }
        Commands::Adhoc {
            project,
            source,
            target,
            context,
            extensions,
        } => {
            if source.trim().is_empty() || target.trim().is_empty() {
                return Err(StackshiftError::Config(
                    "Both --source and --target must be non-empty".to_string(),
                ));
            }
            let request = AdHocRequest {
                source: source.clone(),
                target: target.clone(),
                context: context.clone(),
                file_extensions: extensions.clone(),
            };
            let analysis = engine.analyze_adhoc(project, &request).await?;
            render(format, &analysis, || renderer.adhoc(&analysis))
        }
        Commands::Profiles { detect } => {
            let mut listing = ProfileListing::new(engine.registry());
            if let Some(project) = detect {
                let detected = engine.detect(project).await?.map(|p| p.id.clone());
                listing = listing.with_detection(detected);
            }
            render(format, &listing, || renderer.profiles(&listing))
        }
    }
}

fn render<T, F>(format: OutputFormat, value: &T, text: F) -> crate::error::Result<String>
where
    T: Serialize,
    F: FnOnce() -> crate::error::Result<String>,
{
    match format {
        OutputFormat::Json => render_success(value),
        OutputFormat::Text => text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_adhoc_arguments() {
        let cli = Cli::try_parse_from([
            "stackshift",
            "--format",
            "json",
            "adhoc",
            "./app",
            "--source",
            "Flask",
            "--target",
            "FastAPI",
            "--ext",
            "py",
            "--ext",
            ".pyi",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Adhoc {
                source, extensions, ..
            } => {
                assert_eq!(source, "Flask");
                assert_eq!(extensions, vec!["py", ".pyi"]);
            }
            _ => panic!("expected adhoc"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stackshift", "scan", ".", "-p", "jquery-to-vanilla", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Scan { profile: Some(_), .. }));
    }
}
