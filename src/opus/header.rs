use log::{debug, warn};
use serde::Serialize;

use crate::error::{DemuxError, Result};
use crate::opus::{COMMENT_HEADER_LEN, ID_HEADER_LEN, OPUS_SIGNATURE, OPUS_TAGS};
use crate::source::{read_exact, ByteSource};
use crate::utils::io::{le_u16, le_u32, signature};

/// OpusHead, the first packet of every stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct IdentificationHeader {
    #[serde(skip)]
    pub(crate) signature: [u8; 8],
    pub(crate) version: u8,
    pub(crate) channel_count: u8,
    pub(crate) pre_skip: u16,
    pub(crate) input_sample_rate: u32,
    pub(crate) output_gain: i16,
    pub(crate) mapping_family: u8,
}

impl IdentificationHeader {
    pub fn new(
        channel_count: u8,
        pre_skip: u16,
        input_sample_rate: u32,
        output_gain: i16,
        mapping_family: u8,
    ) -> Self {
        IdentificationHeader {
            signature: *OPUS_SIGNATURE,
            version: 1,
            channel_count,
            pre_skip,
            input_sample_rate,
            output_gain,
            mapping_family,
        }
    }

    pub fn decode(bytes: &[u8; ID_HEADER_LEN]) -> Self {
        IdentificationHeader {
            signature: signature(bytes, 0),
            version: bytes[8],
            channel_count: bytes[9],
            pre_skip: le_u16(bytes, 10),
            input_sample_rate: le_u32(bytes, 12),
            output_gain: le_u16(bytes, 16) as i16,
            mapping_family: bytes[18],
        }
    }

    /// Encode the fixed 19-byte layout
    pub fn to_bytes(&self) -> [u8; ID_HEADER_LEN] {
        let mut bytes = [0u8; ID_HEADER_LEN];
        bytes[0..8].copy_from_slice(&self.signature);
        bytes[8] = self.version;
        bytes[9] = self.channel_count;
        bytes[10..12].copy_from_slice(&self.pre_skip.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.input_sample_rate.to_le_bytes());
        bytes[16..18].copy_from_slice(&self.output_gain.to_le_bytes());
        bytes[18] = self.mapping_family;
        bytes
    }

    pub fn is_valid(&self) -> bool {
        &self.signature == OPUS_SIGNATURE
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    /// Samples (at 48 kHz) to discard from the start of the decoded output
    pub fn pre_skip(&self) -> u16 {
        self.pre_skip
    }

    /// Rate of the original input. Informational only.
    pub fn input_sample_rate(&self) -> u32 {
        self.input_sample_rate
    }

    /// Raw Q7.8 gain
    pub fn output_gain(&self) -> i16 {
        self.output_gain
    }

    pub fn output_gain_db(&self) -> f32 {
        self.output_gain as f32 / 256.0
    }

    pub fn mapping_family(&self) -> u8 {
        self.mapping_family
    }
}

/// OpusTags prefix. The vendor string and user comments are never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommentHeader {
    #[serde(skip)]
    pub(crate) signature: [u8; 8],
    pub(crate) vendor_length: u32,
}

impl CommentHeader {
    pub fn decode(bytes: &[u8; COMMENT_HEADER_LEN]) -> Self {
        CommentHeader {
            signature: signature(bytes, 0),
            vendor_length: le_u32(bytes, 8),
        }
    }

    pub fn is_valid(&self) -> bool {
        &self.signature == OPUS_TAGS
    }

    pub fn vendor_length(&self) -> u32 {
        self.vendor_length
    }
}

/// Read the identification header from the start of its page payload.
///
/// `data_len` is the payload length the page header reported. Anything past
/// the fixed 19 bytes (a channel mapping table) is skipped, so on return the
/// source sits at the end of the payload even when the magic is wrong.
pub fn parse_identification_header<S: ByteSource + ?Sized>(
    source: &mut S,
    data_len: usize,
) -> Result<IdentificationHeader> {
    let mut bytes = [0u8; ID_HEADER_LEN];
    read_fixed(source, &mut bytes, data_len)?;

    let header = IdentificationHeader::decode(&bytes);
    if !header.is_valid() {
        warn!("bad identification header magic: {:02X?}", &bytes[0..8]);
        return Err(DemuxError::BadMagic);
    }

    debug!(
        "OpusHead: version {}, {} channels, pre-skip {}, input rate {} Hz, mapping family {}",
        header.version,
        header.channel_count,
        header.pre_skip,
        header.input_sample_rate,
        header.mapping_family
    );
    Ok(header)
}

/// Read the comment header from the start of its page payload.
///
/// Only the magic and vendor length are kept; the rest of the payload is
/// skipped with a single relative seek.
pub fn parse_comment_header<S: ByteSource + ?Sized>(
    source: &mut S,
    data_len: usize,
) -> Result<CommentHeader> {
    let mut bytes = [0u8; COMMENT_HEADER_LEN];
    read_fixed(source, &mut bytes, data_len)?;

    let header = CommentHeader::decode(&bytes);
    if !header.is_valid() {
        warn!("bad comment header magic: {:02X?}", &bytes[0..8]);
        return Err(DemuxError::BadMagic);
    }

    debug!("OpusTags: vendor string {} bytes", header.vendor_length);
    Ok(header)
}

// Length check, fixed read, then skip whatever the page declares beyond it.
fn read_fixed<S: ByteSource + ?Sized>(source: &mut S, bytes: &mut [u8], data_len: usize) -> Result<()> {
    let needed = bytes.len();
    if data_len < needed {
        warn!("header payload of {} bytes is shorter than {}", data_len, needed);
        return Err(DemuxError::LengthTooShort {
            needed,
            actual: data_len,
        });
    }

    read_exact(source, bytes)?;

    let extra = data_len - needed;
    if extra > 0 {
        let offset = i64::try_from(extra).map_err(|_| DemuxError::Unknown)?;
        source.seek_relative(offset)?;
    }
    Ok(())
}

/// Build an OpusTags packet with a vendor string and user comments.
///
/// Used to assemble test streams; the demuxer itself never parses the body.
///
/// # Panics
///
/// If the vendor string, a comment, or the comment count does not fit in a
/// 32-bit length field.
pub fn comment_packet(vendor: &str, comments: &[&str]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(OPUS_TAGS);

    // Vendor string
    data.extend_from_slice(&length_field(vendor.len()));
    data.extend_from_slice(vendor.as_bytes());

    // User comment list
    data.extend_from_slice(&length_field(comments.len()));
    for comment in comments {
        data.extend_from_slice(&length_field(comment.len()));
        data.extend_from_slice(comment.as_bytes());
    }

    data
}

fn length_field(len: usize) -> [u8; 4] {
    let len = u32::try_from(len).unwrap_or_else(|_| panic!("length {} overflows a u32 field", len));
    len.to_le_bytes()
}
