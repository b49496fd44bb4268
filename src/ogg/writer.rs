// Page construction
//
// Builds well-formed pages in memory. Hosts use it to assemble small test
// assets for a device; the crate's own tests use it for fixtures.

use crate::ogg::{MAX_SEGMENTS, MAX_SEGMENT_LEN, OGG_SIGNATURE, PAGE_PREFIX_LEN};

/// Create the lacing values for a packet of `size` bytes.
///
/// Runs of 255 are followed by a final value below 255, so a packet whose
/// length is a multiple of 255 ends with a 0.
pub fn segment_table_for(size: usize) -> Vec<u8> {
    let mut table = Vec::with_capacity(size / MAX_SEGMENT_LEN + 1);
    let mut remaining = size;

    while remaining >= MAX_SEGMENT_LEN {
        table.push(MAX_SEGMENT_LEN as u8);
        remaining -= MAX_SEGMENT_LEN;
    }
    table.push(remaining as u8);

    table
}

/// Assembles one page from header fields and segments.
///
/// Meant for building fixtures and small assets, so misuse panics instead
/// of returning an error; see `segment` and `laced_packet`.
#[derive(Debug, Clone, Default)]
pub struct PageBuilder {
    version: u8,
    header_type: u8,
    granule_position: u64,
    serial: u32,
    sequence: u32,
    crc: u32,
    segments: Vec<u8>,
    payload: Vec<u8>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn header_type(mut self, header_type: u8) -> Self {
        self.header_type = header_type;
        self
    }

    pub fn granule_position(mut self, granule_position: u64) -> Self {
        self.granule_position = granule_position;
        self
    }

    pub fn serial(mut self, serial: u32) -> Self {
        self.serial = serial;
        self
    }

    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Checksum value written as-is. Readers of this crate never verify it.
    pub fn crc(mut self, crc: u32) -> Self {
        self.crc = crc;
        self
    }

    /// Append one lacing value covering `data`.
    ///
    /// # Panics
    ///
    /// If `data` is longer than 255 bytes or the page already holds 255 segments.
    pub fn segment(mut self, data: &[u8]) -> Self {
        assert!(data.len() <= MAX_SEGMENT_LEN, "segment longer than 255 bytes");
        assert!(self.segments.len() < MAX_SEGMENTS, "page segment table is full");
        self.segments.push(data.len() as u8);
        self.payload.extend_from_slice(data);
        self
    }

    /// Append a packet of any length using standard lacing.
    ///
    /// # Panics
    ///
    /// If the lacing values do not fit in the page's segment table.
    pub fn laced_packet(mut self, data: &[u8]) -> Self {
        let table = segment_table_for(data.len());
        assert!(
            self.segments.len() + table.len() <= MAX_SEGMENTS,
            "page segment table is full"
        );
        self.segments.extend_from_slice(&table);
        self.payload.extend_from_slice(data);
        self
    }

    /// Number of lacing values added so far
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn build(&self) -> Vec<u8> {
        let mut page = Vec::with_capacity(PAGE_PREFIX_LEN + self.segments.len() + self.payload.len());
        page.extend_from_slice(OGG_SIGNATURE);
        page.push(self.version);
        page.push(self.header_type);
        page.extend_from_slice(&self.granule_position.to_le_bytes());
        page.extend_from_slice(&self.serial.to_le_bytes());
        page.extend_from_slice(&self.sequence.to_le_bytes());
        page.extend_from_slice(&self.crc.to_le_bytes());
        page.push(self.segments.len() as u8);
        page.extend_from_slice(&self.segments);
        page.extend_from_slice(&self.payload);
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lacing_values() {
        assert_eq!(segment_table_for(0), vec![0]);
        assert_eq!(segment_table_for(100), vec![100]);
        assert_eq!(segment_table_for(255), vec![255, 0]);
        assert_eq!(segment_table_for(600), vec![255, 255, 90]);
    }

    #[test]
    fn page_layout() {
        let page = PageBuilder::new()
            .header_type(0x02)
            .sequence(1)
            .segment(&[7, 7])
            .build();
        assert_eq!(&page[0..4], b"OggS");
        assert_eq!(page[5], 0x02);
        assert_eq!(&page[18..22], &1u32.to_le_bytes());
        assert_eq!(page[26], 1);
        assert_eq!(page[27], 2);
        assert_eq!(&page[28..], &[7, 7]);
    }

    #[test]
    #[should_panic(expected = "segment longer than 255 bytes")]
    fn oversized_segment_panics() {
        let _ = PageBuilder::new().segment(&[0; 256]);
    }
}
