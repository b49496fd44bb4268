// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

/// Oggstrip - Ogg/Opus demux inspection tool
#[derive(Parser, Debug)]
#[command(name = "oggstrip")]
#[command(about = "Inspect Ogg/Opus streams the way the packet demuxer sees them", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages and logging)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (-v for debug logs, -vv for per-page trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Byte source the demuxer reads through
    #[arg(short, long, value_enum, default_value = "file", global = true)]
    pub source: SourceKind,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Pretty,
    /// Compact JSON
    Json,
    /// Key-value pairs
    KeyValue,
    /// Table format
    Table,
}

/// Which provider backs the demuxer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceKind {
    /// Buffered file reads with relative seeks
    #[default]
    File,
    /// Load the whole file up front and read from memory
    Memory,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show stream headers of Opus file(s)
    Info {
        /// Audio file path(s)
        #[arg(value_name = "FILE")]
        files: Vec<String>,
    },

    /// Walk every packet of an Opus file
    Packets {
        /// Audio file path
        #[arg(value_name = "FILE")]
        file: String,

        /// Print every packet as a base64 JSON line
        #[arg(short, long)]
        dump: bool,

        /// Stop after this many packets
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Check that every matching file can be prepared
    Scan {
        /// Directory path
        #[arg(short, long)]
        directory: String,

        /// File pattern (e.g., "*.opus")
        #[arg(short, long, default_value = "*.opus")]
        pattern: String,
    },
}

impl Config {
    /// Log level implied by --quiet / --verbose
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Off;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
