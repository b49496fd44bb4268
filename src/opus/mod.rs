// OPUS stream headers (in OGG container)
//
// OPUS File Structure:
// - Identification header: "OpusHead" (8 bytes) in first page
// - Comment header: "OpusTags" (8 bytes) followed by Vorbis Comment in second page
// - Audio data pages
//
// Only the fixed-size prefix of each header is decoded. Channel mapping
// tables and the whole tag body are skipped over in the source.
//
// Reference:
// - https://wiki.xiph.org/OggOpus
// - RFC 7845: Ogg Encapsulation for the Opus Audio Codec

pub mod header;

pub use header::{
    comment_packet, parse_comment_header, parse_identification_header, CommentHeader,
    IdentificationHeader,
};

pub const OPUS_SIGNATURE: &[u8; 8] = b"OpusHead";
pub const OPUS_TAGS: &[u8; 8] = b"OpusTags";

/// Fixed part of the identification header
pub const ID_HEADER_LEN: usize = 19;

/// Fixed part of the comment header: magic plus vendor string length
pub const COMMENT_HEADER_LEN: usize = 12;

/// Opus always decodes at 48 kHz regardless of the input rate
pub const OPUS_DECODE_RATE: u32 = 48_000;
