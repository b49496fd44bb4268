//! Oggstrip - a streaming Ogg demultiplexer for Opus audio
//!
//! Pulls Opus packets out of an Ogg stream one at a time, reading a page
//! header only when the previous page is used up. Nothing is buffered beyond
//! a fixed-size page header record, which makes it suitable for a real-time
//! decode loop on a small device.
//!
//! ```no_run
//! use oggstrip::{Demuxer, FileSource};
//!
//! # fn main() -> oggstrip::Result<()> {
//! let mut demuxer = Demuxer::with_source(FileSource::open("tone.opus")?);
//! demuxer.try_prepare()?;
//!
//! let mut packet = [0u8; oggstrip::MAX_SEGMENT_LEN];
//! while let Ok(len) = demuxer.next_packet(&mut packet) {
//!     // hand &packet[..len] to the Opus decoder
//!     let _ = &packet[..len];
//! }
//! # Ok(())
//! # }
//! ```

pub mod demux;
pub mod error;
pub mod ogg;
pub mod opus;
pub mod source;
mod utils;

pub use demux::{Demuxer, WalkerState};
pub use error::{DemuxError, Result};
pub use ogg::{read_page_header, PageHeader, MAX_SEGMENT_LEN};
pub use opus::{
    parse_comment_header, parse_identification_header, CommentHeader, IdentificationHeader,
};
pub use source::{ByteSource, FileSource, MemorySource, ReaderSource};
