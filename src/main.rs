use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use stackshift::cli::Cli;
use stackshift::core::Engine;
use stackshift::output::{render_failure, render_text_failure, OutputFormat};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; stdout carries only the rendered result
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!("Starting Stackshift v{}", env!("CARGO_PKG_VERSION"));

    // Create the core engine with configuration
    let engine = match Engine::new(cli.config.as_deref()).await {
        Ok(engine) => engine,
        Err(e) => {
            match cli.format {
                Some(OutputFormat::Json) => println!("{}", render_failure(&e.to_string())),
                _ => eprintln!("{}", render_text_failure(&e.to_string())),
            }
            return ExitCode::FAILURE;
        }
    };

    // Execute the requested command; failures are already printed
    match cli.execute(engine).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
