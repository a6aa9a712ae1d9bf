use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Stackshift operations
#[derive(Error, Debug)]
pub enum StackshiftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown migration profile \"{id}\". Available: {}", .available.join(", "))]
    UnknownProfile { id: String, available: Vec<String> },

    #[error(
        "Could not auto-detect migration profile for this project. Please specify a profile. Available: {}",
        .available.join(", ")
    )]
    ProfileNotDetected { available: Vec<String> },

    #[error("Project path is not a readable directory: {}", .0.display())]
    ProjectPath(PathBuf),

    #[error("Invalid pattern for rule {rule}: {message}")]
    Pattern { rule: String, message: String },

    #[error("Invalid file glob {glob}: {message}")]
    Glob { glob: String, message: String },

    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile catalog {name}: {message}")]
    Catalog { name: String, message: String },

    #[error("Research error: {0}")]
    Research(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),
}

pub type Result<T> = std::result::Result<T, StackshiftError>;
