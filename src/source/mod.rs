// Byte source capability
//
// The demuxer never owns the audio bytes. It pulls them through this trait,
// which a file-backed provider and a bounded memory provider implement.
//
// Operations:
// - read: copy up to buf.len() bytes, returning how many were copied
// - seek_relative: move the read position forward or backward
// - rewind: go back to the first byte

pub mod memory;
pub mod reader;

pub use memory::MemorySource;
pub use reader::{FileSource, ReaderSource};

use crate::error::{DemuxError, Result};

pub trait ByteSource {
    /// Read up to `buf.len()` bytes. A short count means the source is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Move the read position by `offset` bytes relative to where it is now.
    fn seek_relative(&mut self, offset: i64) -> Result<()>;

    /// Return to the start of the source.
    fn rewind(&mut self) -> Result<()>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn seek_relative(&mut self, offset: i64) -> Result<()> {
        (**self).seek_relative(offset)
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read(buf)
    }

    fn seek_relative(&mut self, offset: i64) -> Result<()> {
        (**self).seek_relative(offset)
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }
}

/// Fill `buf` completely or fail with `EndOfInput`.
pub(crate) fn read_exact<S: ByteSource + ?Sized>(source: &mut S, buf: &mut [u8]) -> Result<()> {
    let count = source.read(buf)?;
    if count == buf.len() {
        Ok(())
    } else {
        Err(DemuxError::EndOfInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_exact_reports_short_reads() {
        let bytes = [1u8, 2, 3];
        let mut source = MemorySource::new(&bytes);
        let mut buf = [0u8; 4];
        assert!(matches!(read_exact(&mut source, &mut buf), Err(DemuxError::EndOfInput)));
    }

    #[test]
    fn borrowed_source_forwards_calls() {
        let bytes = [9u8, 8, 7, 6];
        let mut owned = MemorySource::new(&bytes);
        {
            let mut borrowed = &mut owned;
            let mut buf = [0u8; 2];
            read_exact(&mut borrowed, &mut buf).unwrap();
            assert_eq!(buf, [9, 8]);
        }
        assert_eq!(owned.position(), 2);
    }

    #[test]
    fn boxed_source_is_a_source() {
        let bytes = [4u8, 5, 6];
        let mut boxed: Box<dyn ByteSource + '_> = Box::new(MemorySource::new(&bytes));
        boxed.seek_relative(1).unwrap();
        let mut buf = [0u8; 2];
        read_exact(&mut boxed, &mut buf).unwrap();
        assert_eq!(buf, [5, 6]);
    }
}
