use log::{trace, warn};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{DemuxError, Result};
use crate::ogg::{
    MAX_SEGMENTS, OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_CONTINUATION, OGG_HEADER_TYPE_EOS,
    OGG_SIGNATURE, PAGE_PREFIX_LEN,
};
use crate::source::{read_exact, ByteSource};
use crate::utils::io::{le_u32, le_u64, signature};

/// OGG Page Header
///
/// Only one of these is live per session; every page read overwrites it.
/// The segment table is a fixed 255-entry array so a header never allocates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageHeader {
    pub(crate) signature: [u8; 4],
    pub(crate) version: u8,
    pub(crate) header_type: u8,
    pub(crate) granule_position: u64,
    pub(crate) bitstream_serial: u32,
    pub(crate) page_sequence: u32,
    pub(crate) crc: u32,
    pub(crate) segment_count: u8,
    pub(crate) segment_table: [u8; MAX_SEGMENTS],
    pub(crate) data_length: u32,
}

impl Default for PageHeader {
    fn default() -> Self {
        PageHeader {
            signature: [0; 4],
            version: 0,
            header_type: 0,
            granule_position: 0,
            bitstream_serial: 0,
            page_sequence: 0,
            crc: 0,
            segment_count: 0,
            segment_table: [0; MAX_SEGMENTS],
            data_length: 0,
        }
    }
}

impl PageHeader {
    /// Decode the fixed 27-byte prefix. The segment table is left empty.
    pub fn decode_prefix(prefix: &[u8; PAGE_PREFIX_LEN]) -> Self {
        PageHeader {
            signature: signature(prefix, 0),
            version: prefix[4],
            header_type: prefix[5],
            granule_position: le_u64(prefix, 6),
            bitstream_serial: le_u32(prefix, 14),
            page_sequence: le_u32(prefix, 18),
            crc: le_u32(prefix, 22),
            segment_count: prefix[26],
            ..PageHeader::default()
        }
    }

    pub fn signature(&self) -> &[u8; 4] {
        &self.signature
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn header_type(&self) -> u8 {
        self.header_type
    }

    pub fn granule_position(&self) -> u64 {
        self.granule_position
    }

    pub fn bitstream_serial(&self) -> u32 {
        self.bitstream_serial
    }

    pub fn page_sequence(&self) -> u32 {
        self.page_sequence
    }

    /// Stored checksum. It is carried through but never verified.
    pub fn crc(&self) -> u32 {
        self.crc
    }

    pub fn segment_count(&self) -> u8 {
        self.segment_count
    }

    /// The lacing values, in on-wire order
    pub fn segments(&self) -> &[u8] {
        &self.segment_table[..self.segment_count as usize]
    }

    /// Total payload length, the sum of the segment table
    pub fn data_length(&self) -> u32 {
        self.data_length
    }

    pub fn is_continuation(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_CONTINUATION != 0
    }

    /// Check if this is the beginning of a stream
    pub fn is_bos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_BOS != 0
    }

    /// Check if this is the end of a stream
    pub fn is_eos(&self) -> bool {
        self.header_type & OGG_HEADER_TYPE_EOS != 0
    }

    fn compute_data_length(&mut self) -> u32 {
        self.data_length = self.segments().iter().map(|&x| x as u32).sum();
        self.data_length
    }
}

impl Serialize for PageHeader {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("PageHeader", 11)?;
        state.serialize_field("version", &self.version)?;
        state.serialize_field("header_type", &self.header_type)?;
        state.serialize_field("continuation", &self.is_continuation())?;
        state.serialize_field("bos", &self.is_bos())?;
        state.serialize_field("eos", &self.is_eos())?;
        state.serialize_field("granule_position", &self.granule_position)?;
        state.serialize_field("bitstream_serial", &self.bitstream_serial)?;
        state.serialize_field("page_sequence", &self.page_sequence)?;
        state.serialize_field("crc", &self.crc)?;
        state.serialize_field("segment_table", self.segments())?;
        state.serialize_field("data_length", &self.data_length)?;
        state.end()
    }
}

/// Read one page header from the source.
///
/// The source must sit on the first byte of a page. On success the live
/// header is overwritten, the source sits on the first payload byte and the
/// payload length is returned.
///
/// A prefix with the wrong magic leaves `header` untouched and consumes only
/// the 27 prefix bytes. A zero-segment page is committed to `header` (so it
/// can be inspected) and reported as `NoSegments`.
pub fn read_page_header<S: ByteSource + ?Sized>(
    source: &mut S,
    header: &mut PageHeader,
) -> Result<usize> {
    let mut prefix = [0u8; PAGE_PREFIX_LEN];
    if source.read(&mut prefix)? != PAGE_PREFIX_LEN {
        trace!("end of input while reading page header");
        return Err(DemuxError::EndOfInput);
    }

    if &prefix[0..4] != OGG_SIGNATURE {
        warn!("bad page magic: {:02X?}", &prefix[0..4]);
        return Err(DemuxError::BadMagic);
    }

    let mut decoded = PageHeader::decode_prefix(&prefix);
    if decoded.segment_count == 0 {
        warn!("page {} declares no segments", decoded.page_sequence);
        *header = decoded;
        return Err(DemuxError::NoSegments);
    }

    // Read segment table
    let count = decoded.segment_count as usize;
    read_exact(source, &mut decoded.segment_table[..count])?;
    let data_length = decoded.compute_data_length();
    trace!(
        "page {}: {} segments, {} bytes",
        decoded.page_sequence,
        count,
        data_length
    );

    *header = decoded;
    Ok(data_length as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogg::writer::PageBuilder;
    use crate::source::MemorySource;

    #[test]
    fn decodes_every_prefix_field() {
        let bytes = PageBuilder::new()
            .header_type(OGG_HEADER_TYPE_BOS | OGG_HEADER_TYPE_EOS)
            .granule_position(0x0102_0304_0506_0708)
            .serial(0xCAFE_BABE)
            .sequence(7)
            .crc(0xDEAD_BEEF)
            .segment(&[1, 2, 3])
            .build();
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();

        assert_eq!(read_page_header(&mut source, &mut header).unwrap(), 3);
        assert_eq!(header.signature(), OGG_SIGNATURE);
        assert_eq!(header.version(), 0);
        assert!(header.is_bos());
        assert!(header.is_eos());
        assert!(!header.is_continuation());
        assert_eq!(header.granule_position(), 0x0102_0304_0506_0708);
        assert_eq!(header.bitstream_serial(), 0xCAFE_BABE);
        assert_eq!(header.page_sequence(), 7);
        assert_eq!(header.crc(), 0xDEAD_BEEF);
        assert_eq!(header.segments(), &[3]);
    }

    #[test]
    fn data_length_is_sum_of_segments_and_source_sits_on_payload() {
        let bytes = PageBuilder::new()
            .segment(&[0xAA; 255])
            .segment(&[0xBB; 10])
            .segment(&[])
            .segment(&[0xCC; 40])
            .build();
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();

        let len = read_page_header(&mut source, &mut header).unwrap();
        assert_eq!(len, 255 + 10 + 40);
        assert_eq!(header.data_length() as usize, len);
        assert_eq!(header.segments(), &[255, 10, 0, 40]);
        assert_eq!(source.position(), PAGE_PREFIX_LEN + 4);
        assert_eq!(source.remaining(), len);
    }

    #[test]
    fn full_segment_table() {
        let mut builder = PageBuilder::new();
        for _ in 0..MAX_SEGMENTS {
            builder = builder.segment(&[1]);
        }
        let bytes = builder.build();
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();
        assert_eq!(read_page_header(&mut source, &mut header).unwrap(), MAX_SEGMENTS);
        assert_eq!(header.segment_count() as usize, MAX_SEGMENTS);
    }

    #[test]
    fn zero_segments_is_an_error_and_stops_after_prefix() {
        let mut bytes = PageBuilder::new().sequence(3).build();
        bytes.extend_from_slice(&[0x55; 8]);
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();

        assert!(matches!(
            read_page_header(&mut source, &mut header),
            Err(DemuxError::NoSegments)
        ));
        assert_eq!(source.position(), PAGE_PREFIX_LEN);
        assert_eq!(header.page_sequence(), 3);
        assert_eq!(header.data_length(), 0);
    }

    #[test]
    fn one_byte_short_of_prefix_is_end_of_input() {
        let bytes = PageBuilder::new().segment(&[1, 2]).build();
        let mut source = MemorySource::new(&bytes[..PAGE_PREFIX_LEN - 1]);
        let mut header = PageHeader::default();

        assert!(matches!(
            read_page_header(&mut source, &mut header),
            Err(DemuxError::EndOfInput)
        ));
        assert_eq!(header, PageHeader::default());
    }

    #[test]
    fn corrupted_magic_consumes_only_the_prefix() {
        let mut bytes = PageBuilder::new().segment(&[1, 2, 3]).build();
        bytes[3] = b'X';
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();

        assert!(matches!(
            read_page_header(&mut source, &mut header),
            Err(DemuxError::BadMagic)
        ));
        assert_eq!(source.position(), PAGE_PREFIX_LEN);
        assert_eq!(header, PageHeader::default());
    }

    #[test]
    fn truncated_segment_table_is_end_of_input() {
        let bytes = PageBuilder::new().segment(&[1]).segment(&[2]).segment(&[3]).build();
        let mut source = MemorySource::new(&bytes[..PAGE_PREFIX_LEN + 2]);
        let mut header = PageHeader::default();

        assert!(matches!(
            read_page_header(&mut source, &mut header),
            Err(DemuxError::EndOfInput)
        ));
        assert_eq!(header.segment_count(), 0);
    }

    #[test]
    fn crc_is_not_verified() {
        let bytes = PageBuilder::new().crc(0).segment(&[9; 4]).build();
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();
        assert_eq!(read_page_header(&mut source, &mut header).unwrap(), 4);
    }

    #[test]
    fn serializes_for_diagnostics() {
        let bytes = PageBuilder::new().sequence(2).segment(&[1, 2]).build();
        let mut source = MemorySource::new(&bytes);
        let mut header = PageHeader::default();
        read_page_header(&mut source, &mut header).unwrap();

        let value = serde_json::to_value(&header).unwrap();
        assert_eq!(value["page_sequence"], 2);
        assert_eq!(value["segment_table"], serde_json::json!([2]));
        assert_eq!(value["data_length"], 2);
    }
}
