// File-backed provider
//
// Any `Read + Seek` works. Reads go through a `BufReader`, and relative seeks
// stay inside its buffer when they can, so skipping a header tail does not
// throw away bytes already fetched. `FileSource` is the file flavour the CLI
// and most hosts use.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;
use crate::source::ByteSource;

pub type FileSource = ReaderSource<File>;

#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: BufReader<R>,
}

impl<R: Read + Seek> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        ReaderSource {
            inner: BufReader::new(inner),
        }
    }

    pub fn get_ref(&self) -> &R {
        self.inner.get_ref()
    }

    /// Unwrap the reader. Buffered but unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

impl FileSource {
    /// Open a file for sequential reading
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(ReaderSource::new(file))
    }
}

impl<R: Read + Seek> ByteSource for ReaderSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        // Keep going until the buffer is full or the reader is dry, like fread.
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    fn seek_relative(&mut self, offset: i64) -> Result<()> {
        self.inner.seek_relative(offset)?;
        Ok(())
    }

    fn rewind(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}
