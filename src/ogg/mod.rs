// OGG container support
//
// OGG File Structure:
// - OGG Page Header (27 bytes)
//   - Capture Pattern: "OggS" (4 bytes)
//   - Version: 0 (1 byte)
//   - Header Type: 1=continuation, 2=bos, 4=eos (1 byte)
//   - Granule Position (8 bytes)
//   - Bitstream Serial Number (4 bytes)
//   - Page Sequence Number (4 bytes)
//   - CRC Checksum (4 bytes)
//   - Number of Page Segments (1 byte)
//   - Segment Table (variable)
//
// Opus-in-Ogg Structure:
// 1. Identification Header (first page)
// 2. Comment Header (second page)
// 3. Audio Data pages

pub mod page;
pub mod writer;

pub use page::{read_page_header, PageHeader};

// OGG signature
pub const OGG_SIGNATURE: &[u8; 4] = b"OggS";

/// Size of the fixed page header prefix, before the segment table
pub const PAGE_PREFIX_LEN: usize = 27;

/// A page can carry at most this many lacing values
pub const MAX_SEGMENTS: usize = 255;

/// Largest payload a single lacing value can describe
pub const MAX_SEGMENT_LEN: usize = 255;

// OGG page header types
pub const OGG_HEADER_TYPE_CONTINUATION: u8 = 0x01;
pub const OGG_HEADER_TYPE_BOS: u8 = 0x02; // Beginning of Stream
pub const OGG_HEADER_TYPE_EOS: u8 = 0x04; // End of Stream
