// Demux session
//
// A `Demuxer` is the whole state of one stream: the bound source, the live
// page header, both stream headers and the packet walker. Nothing is global,
// so independent sessions can run side by side. Memory use is fixed; the
// only buffers are the caller's.
//
// Typical real-time loop:
// 1. set a source and call `prepare` once
// 2. call `next_packet` per frame and hand the bytes to the decoder
// 3. on error, stop pulling and switch to silence

pub mod walker;

pub use walker::WalkerState;

use log::{debug, info, trace, warn};

use crate::error::{DemuxError, Result};
use crate::ogg::{read_page_header, PageHeader};
use crate::opus::{
    parse_comment_header, parse_identification_header, CommentHeader, IdentificationHeader,
};
use crate::source::{read_exact, ByteSource};

#[derive(Debug)]
pub struct Demuxer<S> {
    source: Option<S>,
    page: PageHeader,
    id_header: IdentificationHeader,
    comment_header: CommentHeader,
    walker: WalkerState,
    prepared: bool,
}

impl<S> Default for Demuxer<S> {
    fn default() -> Self {
        Demuxer {
            source: None,
            page: PageHeader::default(),
            id_header: IdentificationHeader::default(),
            comment_header: CommentHeader::default(),
            walker: WalkerState::AtPageBoundary,
            prepared: false,
        }
    }
}

impl<S: ByteSource> Demuxer<S> {
    /// Session with no source bound. Every read fails with `NullSource`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: S) -> Self {
        let mut demuxer = Self::default();
        demuxer.source = Some(source);
        demuxer
    }

    /// Bind a new source, or unbind with `None`. Returns the previous one.
    ///
    /// The walker goes back to a page boundary and the session must be
    /// prepared again before pulling packets.
    pub fn set_source(&mut self, source: Option<S>) -> Option<S> {
        self.reset();
        std::mem::replace(&mut self.source, source)
    }

    pub fn source(&self) -> Option<&S> {
        self.source.as_ref()
    }

    pub fn into_source(self) -> Option<S> {
        self.source
    }

    /// Rewind and consume both stream headers.
    ///
    /// Returns true when the identification and comment headers were read and
    /// the comment page carried data. The source is then positioned on the
    /// first audio page.
    pub fn prepare(&mut self) -> bool {
        match self.try_prepare() {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to prepare stream: {} (code {})", e, e.code());
                false
            }
        }
    }

    /// Same as `prepare`, reporting the first failure.
    pub fn try_prepare(&mut self) -> Result<()> {
        self.reset();

        let source = self.source.as_mut().ok_or(DemuxError::NullSource)?;
        source.rewind()?;

        let data_len = read_page_header(source, &mut self.page)?;
        self.id_header = parse_identification_header(source, data_len)?;
        debug!("got identification header");

        // A parsed comment header implies the page carried at least 12 bytes.
        let data_len = read_page_header(source, &mut self.page)?;
        self.comment_header = parse_comment_header(source, data_len)?;
        debug!("got comment header");

        info!(
            "stream ready: {} channels, pre-skip {}, serial {:#010x}",
            self.id_header.channel_count(),
            self.id_header.pre_skip(),
            self.page.bitstream_serial()
        );
        self.prepared = true;
        Ok(())
    }

    /// Copy the next packet into `dest` and return its length.
    ///
    /// A packet here is exactly one lacing value's worth of bytes; runs of
    /// 255-byte segments are handed out one at a time, not joined. `dest`
    /// must hold at least 255 bytes to take any segment. A shorter buffer
    /// that cannot fit the next segment gets `BufferTooSmall` and nothing is
    /// consumed.
    ///
    /// When the current page is used up, the next page header is read first.
    /// If that fails the walker stays at the page boundary and the error is
    /// returned; the stream should be treated as ended.
    pub fn next_packet(&mut self, dest: &mut [u8]) -> Result<usize> {
        let source = self.source.as_mut().ok_or(DemuxError::NullSource)?;

        let cursor = match self.walker {
            WalkerState::AtPageBoundary => {
                read_page_header(source, &mut self.page)?;
                self.walker = WalkerState::WithinPage { cursor: 0 };
                0
            }
            WalkerState::WithinPage { cursor } => cursor,
        };

        let len = self.page.segment_table[cursor as usize] as usize;
        if dest.len() < len {
            return Err(DemuxError::BufferTooSmall {
                needed: len,
                available: dest.len(),
            });
        }

        self.walker = WalkerState::after(cursor, self.page.segment_count);
        let count = source.read(&mut dest[..len])?;
        if count != len {
            trace!("packet cut short: {} of {} bytes", count, len);
            return Err(DemuxError::EndOfInput);
        }

        Ok(len)
    }

    /// Copy the payload of the next whole page into `dest`.
    ///
    /// The payload is truncated to `dest.len()`; the rest of the page is
    /// skipped so the source stays on a page boundary. Called in the middle
    /// of a page, the unread segments of that page are skipped first.
    pub fn next_data_page(&mut self, dest: &mut [u8]) -> Result<usize> {
        let source = self.source.as_mut().ok_or(DemuxError::NullSource)?;

        if let WalkerState::WithinPage { cursor } = self.walker {
            let unread: usize = self.page.segments()[cursor as usize..]
                .iter()
                .map(|&x| x as usize)
                .sum();
            self.walker = WalkerState::AtPageBoundary;
            skip(source, unread)?;
        }

        let data_len = read_page_header(source, &mut self.page)?;
        let take = data_len.min(dest.len());
        read_exact(source, &mut dest[..take])?;
        skip(source, data_len - take)?;

        if take < data_len {
            debug!("page {} truncated to {} of {} bytes", self.page.page_sequence(), take, data_len);
        }
        Ok(take)
    }

    /// The most recently read page header.
    ///
    /// Overwritten by the next page read.
    pub fn last_page_header(&self) -> &PageHeader {
        &self.page
    }

    pub fn identification_header(&self) -> &IdentificationHeader {
        &self.id_header
    }

    pub fn comment_header(&self) -> &CommentHeader {
        &self.comment_header
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    pub fn walker_state(&self) -> WalkerState {
        self.walker
    }

    // Forget everything learned from the previous stream.
    fn reset(&mut self) {
        self.page = PageHeader::default();
        self.id_header = IdentificationHeader::default();
        self.comment_header = CommentHeader::default();
        self.walker = WalkerState::AtPageBoundary;
        self.prepared = false;
    }
}

fn skip<S: ByteSource + ?Sized>(source: &mut S, count: usize) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let offset = i64::try_from(count).map_err(|_| DemuxError::Unknown)?;
    source.seek_relative(offset)
}
