// CLI binary entry point for oggstrip
//
// Inspects Ogg/Opus files through the same demuxer a device runs.

mod cli;

use clap::Parser;
use std::process;

use cli::Config;

fn main() {
    let config = Config::parse();

    if let Err(e) = cli::logger::init(config.log_level()) {
        eprintln!("Warning: logging disabled ({})", e);
    }

    if let Err(e) = run(&config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(config: &Config) -> anyhow::Result<()> {
    cli::commands::run(config)?;
    Ok(())
}
