// CLI module for oggstrip
//
// Command-line front end over the library. Only compiled into the binary.

pub mod commands;
pub mod config;
pub mod logger;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;

use thiserror::Error;

// Error type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("File not found: {0}")]
    FileNotFound(String),
    #[error("No files specified")]
    NoFiles,
    #[error("{path}: {source}")]
    Demux {
        path: String,
        #[source]
        source: oggstrip::DemuxError,
    },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}
