// Terminal logging for the CLI

use log::LevelFilter;
use simplelog::{format_description, ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

/// Initialize logging to stderr at `level`
pub fn init(level: LevelFilter) -> anyhow::Result<()> {
    let config = ConfigBuilder::new()
        .set_time_format_custom(format_description!(
            "[month]-[day] [hour]:[minute]:[second]"
        ))
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Trace)
        .build();

    TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?;
    Ok(())
}
