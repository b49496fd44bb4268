// Fixed memory-region provider
//
// Borrows a byte slice (a flash-resident asset, an `include_bytes!` blob, a
// buffer read up front) and never reads past the declared length.

use log::trace;

use crate::error::{DemuxError, Result};
use crate::source::ByteSource;

#[derive(Debug, Clone)]
pub struct MemorySource<'a> {
    data: &'a [u8],
    length: usize,
    position: usize,
}

impl<'a> MemorySource<'a> {
    /// Wrap the whole slice
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_length(data, data.len())
    }

    /// Wrap a slice with an explicit total-length bound.
    ///
    /// The bound is clamped to the slice, so a length larger than the backing
    /// region can never be used to read out of it.
    pub fn with_length(data: &'a [u8], length: usize) -> Self {
        MemorySource {
            data,
            length: length.min(data.len()),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bytes left between the read position and the length bound
    pub fn remaining(&self) -> usize {
        self.length - self.position
    }
}

impl ByteSource for MemorySource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let count = buf.len().min(self.remaining());
        buf[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }

    fn seek_relative(&mut self, offset: i64) -> Result<()> {
        let target = i64::try_from(self.position)
            .ok()
            .and_then(|pos| pos.checked_add(offset))
            .ok_or(DemuxError::Unknown)?;
        if target < 0 {
            return Err(DemuxError::Unknown);
        }
        // Seeking past the end parks at the bound; the next read comes back short.
        let target = usize::try_from(target).map_err(|_| DemuxError::Unknown)?;
        if target > self.length {
            trace!("seek to {} clamped to length {}", target, self.length);
        }
        self.position = target.min(self.length);
        Ok(())
    }

    fn rewind(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_stop_at_length_bound() {
        let bytes = [1u8, 2, 3, 4, 5, 6];
        let mut source = MemorySource::with_length(&bytes, 4);
        let mut buf = [0u8; 6];
        assert_eq!(source.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[1, 2, 3, 4]);
        assert_eq!(source.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn length_bound_is_clamped_to_slice() {
        let bytes = [0u8; 3];
        let source = MemorySource::with_length(&bytes, 100);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn seek_forward_back_and_rewind() {
        let bytes = [10u8, 11, 12, 13, 14];
        let mut source = MemorySource::new(&bytes);
        source.seek_relative(3).unwrap();
        let mut one = [0u8; 1];
        source.read(&mut one).unwrap();
        assert_eq!(one[0], 13);

        source.seek_relative(-3).unwrap();
        source.read(&mut one).unwrap();
        assert_eq!(one[0], 11);

        source.rewind().unwrap();
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn seek_past_end_parks_at_bound() {
        let bytes = [0u8; 8];
        let mut source = MemorySource::new(&bytes);
        source.seek_relative(50).unwrap();
        assert_eq!(source.position(), 8);
        assert_eq!(source.remaining(), 0);
    }

    #[test]
    fn seek_before_start_is_rejected() {
        let bytes = [0u8; 8];
        let mut source = MemorySource::new(&bytes);
        source.seek_relative(2).unwrap();
        assert!(matches!(source.seek_relative(-3), Err(DemuxError::Unknown)));
        assert_eq!(source.position(), 2);
    }
}
