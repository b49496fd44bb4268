// CLI command implementations
use std::io::{self, Write};
use std::path::Path;

use base64::Engine;
use log::debug;
use serde::Serialize;

use oggstrip::{
    ByteSource, CommentHeader, DemuxError, Demuxer, FileSource, IdentificationHeader,
    MemorySource, PageHeader, MAX_SEGMENT_LEN,
};

use crate::cli::config::SourceKind;
use crate::cli::{CliError, CliResult, Commands, Config, OutputFormatter};

const OPUS_DECODE_RATE: u64 = oggstrip::opus::OPUS_DECODE_RATE as u64;

/// Dispatch the parsed command line
pub fn run(config: &Config) -> CliResult<()> {
    let formatter = OutputFormatter::new(config.format, config.quiet);

    let stdout = io::stdout();
    let mut writer = stdout.lock();

    match &config.command {
        Commands::Info { files } => command_info(files, config.source, &formatter, &mut writer),
        Commands::Packets { file, dump, limit } => {
            command_packets(file, *dump, *limit, config.source, &formatter, &mut writer)?;
            Ok(())
        }
        Commands::Scan { directory, pattern } => {
            command_scan(directory, pattern, config.source, &formatter)?;
            Ok(())
        }
    }
}

/// Open `path` through the requested provider.
///
/// The memory provider reads the whole file into `storage` and borrows it.
fn open_source<'a>(
    path: &str,
    kind: SourceKind,
    storage: &'a mut Vec<u8>,
) -> CliResult<Box<dyn ByteSource + 'a>> {
    if !Path::new(path).exists() {
        return Err(CliError::FileNotFound(path.to_string()));
    }

    let demux_err = |source: DemuxError| CliError::Demux {
        path: path.to_string(),
        source,
    };

    match kind {
        SourceKind::File => Ok(Box::new(FileSource::open(path).map_err(demux_err)?)),
        SourceKind::Memory => {
            *storage = std::fs::read(path)?;
            debug!("loaded {} bytes of {} into memory", storage.len(), path);
            Ok(Box::new(MemorySource::new(storage.as_slice())))
        }
    }
}

#[derive(Serialize)]
struct InfoReport<'a> {
    file: &'a str,
    size: u64,
    modified: Option<String>,
    identification: IdentificationHeader,
    output_gain_db: f32,
    comment: CommentHeader,
    first_audio_page: Option<PageHeader>,
}

/// Show stream headers
fn command_info(
    files: &[String],
    kind: SourceKind,
    formatter: &OutputFormatter,
    writer: &mut impl Write,
) -> CliResult<()> {
    if files.is_empty() {
        return Err(CliError::NoFiles);
    }

    for file_path in files {
        match info_report(file_path, kind) {
            Ok(report) => formatter.output(&report, writer)?,
            Err(e) => formatter.print_error(&e.to_string()),
        }
    }

    Ok(())
}

fn info_report(file_path: &str, kind: SourceKind) -> CliResult<InfoReport<'_>> {
    let mut storage = Vec::new();
    let source = open_source(file_path, kind, &mut storage)?;

    let metadata = std::fs::metadata(file_path)?;
    let modified = metadata.modified().ok().map(|mtime| {
        chrono::DateTime::<chrono::Utc>::from(mtime)
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
    });

    let mut demuxer = Demuxer::with_source(source);
    demuxer.try_prepare().map_err(|source| CliError::Demux {
        path: file_path.to_string(),
        source,
    })?;

    // Pull one packet so the first audio page header is live.
    let mut packet = [0u8; MAX_SEGMENT_LEN];
    let first_audio_page = match demuxer.next_packet(&mut packet) {
        Ok(_) => Some(demuxer.last_page_header().clone()),
        Err(e) => {
            debug!("{}: no audio page ({})", file_path, e);
            None
        }
    };

    let identification = *demuxer.identification_header();
    Ok(InfoReport {
        file: file_path,
        size: metadata.len(),
        modified,
        output_gain_db: identification.output_gain_db(),
        identification,
        comment: *demuxer.comment_header(),
        first_audio_page,
    })
}

#[derive(Debug, Serialize, Default)]
struct PacketSummary {
    packets: u64,
    empty_packets: u64,
    pages: u64,
    total_bytes: u64,
    largest_packet: usize,
    last_granule_position: u64,
    duration_seconds: f64,
    end: String,
}

#[derive(Serialize)]
struct PacketLine {
    index: u64,
    page: u32,
    granule_position: u64,
    len: usize,
    data: String,
}

/// Walk every packet of a file
fn command_packets(
    file_path: &str,
    dump: bool,
    limit: Option<usize>,
    kind: SourceKind,
    formatter: &OutputFormatter,
    writer: &mut impl Write,
) -> CliResult<PacketSummary> {
    let mut storage = Vec::new();
    let source = open_source(file_path, kind, &mut storage)?;
    let mut demuxer = Demuxer::with_source(source);
    demuxer.try_prepare().map_err(|source| CliError::Demux {
        path: file_path.to_string(),
        source,
    })?;

    let engine = base64::engine::general_purpose::STANDARD;

    let mut summary = PacketSummary::default();
    let mut packet = [0u8; MAX_SEGMENT_LEN];
    loop {
        if limit.is_some_and(|limit| summary.packets as usize >= limit) {
            summary.end = "limit reached".to_string();
            break;
        }

        let new_page = demuxer.walker_state().is_at_page_boundary();
        let len = match demuxer.next_packet(&mut packet) {
            Ok(len) => len,
            Err(e) => {
                summary.end = e.to_string();
                break;
            }
        };

        let page = demuxer.last_page_header();
        if new_page {
            summary.pages += 1;
        }
        summary.packets += 1;
        summary.total_bytes += len as u64;
        summary.largest_packet = summary.largest_packet.max(len);
        summary.last_granule_position = page.granule_position();
        if len == 0 {
            summary.empty_packets += 1;
        }

        if dump {
            let line = PacketLine {
                index: summary.packets - 1,
                page: page.page_sequence(),
                granule_position: page.granule_position(),
                len,
                data: engine.encode(&packet[..len]),
            };
            writeln!(writer, "{}", serde_json::to_string(&line)?)?;
        }
    }

    let pre_skip = demuxer.identification_header().pre_skip() as u64;
    let samples = summary.last_granule_position.saturating_sub(pre_skip);
    summary.duration_seconds = samples as f64 / OPUS_DECODE_RATE as f64;

    if !dump || !formatter.quiet() {
        formatter.output(&summary, writer)?;
    }
    Ok(summary)
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ScanSummary {
    ok: usize,
    failed: usize,
}

/// Check every file matching a pattern
fn command_scan(
    directory: &str,
    pattern: &str,
    kind: SourceKind,
    formatter: &OutputFormatter,
) -> CliResult<ScanSummary> {
    // Build glob pattern
    let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
        format!("{}/{}", directory, pattern)
    } else {
        format!("{}/**/{}", directory, pattern)
    };

    let mut files: Vec<String> = Vec::new();
    for entry in glob::glob(&glob_pattern)? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    if let Some(path_str) = path.to_str() {
                        files.push(path_str.to_string());
                    }
                }
            }
            Err(e) => formatter.print_error(&format!("Error reading path: {}", e)),
        }
    }

    if files.is_empty() {
        formatter.print_info("No files found matching pattern");
        return Ok(ScanSummary::default());
    }
    formatter.print_info(&format!("Scanning {} files...", files.len()));

    let mut summary = ScanSummary::default();
    for file_path in &files {
        let mut storage = Vec::new();
        let result = open_source(file_path, kind, &mut storage).and_then(|source| {
            let mut demuxer = Demuxer::with_source(source);
            demuxer.try_prepare().map_err(|source| CliError::Demux {
                path: file_path.clone(),
                source,
            })?;
            Ok(demuxer.identification_header().channel_count())
        });

        match result {
            Ok(channels) => {
                formatter.print_success(&format!("{} ({} ch)", file_path, channels));
                summary.ok += 1;
            }
            Err(e) => {
                formatter.print_error(&e.to_string());
                summary.failed += 1;
            }
        }
    }

    formatter.print_info(&format!(
        "Completed: {} ok, {} failed",
        summary.ok, summary.failed
    ));
    Ok(summary)
}
