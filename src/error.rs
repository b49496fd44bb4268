// Error types for the demuxer
//
// Every parsing step returns its failure to the immediate caller. Nothing is
// retried and nothing resynchronizes; a failed page read ends the session.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DemuxError>;

#[derive(Debug, Error)]
pub enum DemuxError {
    /// The source ran out of bytes in the middle of a read
    #[error("unexpected end of input")]
    EndOfInput,
    /// A page or sub-header signature did not match
    #[error("bad magic signature")]
    BadMagic,
    /// A page header declared zero segments
    #[error("page header declares no segments")]
    NoSegments,
    /// A sub-header payload is smaller than its fixed structure
    #[error("header payload too short: need {needed} bytes, page carries {actual}")]
    LengthTooShort { needed: usize, actual: usize },
    /// No byte source is bound to the session
    #[error("no byte source bound")]
    NullSource,
    /// The destination cannot hold the next packet; nothing was consumed
    #[error("destination too small: packet needs {needed} bytes, buffer holds {available}")]
    BufferTooSmall { needed: usize, available: usize },
    /// The file-backed provider failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown error")]
    Unknown,
}

impl DemuxError {
    /// Legacy status code, kept for log lines and device-side diagnostics.
    pub fn code(&self) -> i32 {
        match self {
            DemuxError::Unknown | DemuxError::BufferTooSmall { .. } => -1,
            DemuxError::EndOfInput | DemuxError::Io(_) => -2,
            DemuxError::BadMagic => -3,
            DemuxError::NoSegments => -4,
            DemuxError::LengthTooShort { .. } => -5,
            DemuxError::NullSource => -6,
        }
    }

    /// True for the kinds a real-time loop should read as "stream ended".
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, DemuxError::EndOfInput | DemuxError::NoSegments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_codes() {
        assert_eq!(DemuxError::Unknown.code(), -1);
        assert_eq!(DemuxError::EndOfInput.code(), -2);
        assert_eq!(DemuxError::BadMagic.code(), -3);
        assert_eq!(DemuxError::NoSegments.code(), -4);
        assert_eq!(DemuxError::LengthTooShort { needed: 19, actual: 4 }.code(), -5);
        assert_eq!(DemuxError::NullSource.code(), -6);
    }

    #[test]
    fn io_errors_convert() {
        let err: DemuxError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, DemuxError::Io(_)));
        assert_eq!(err.code(), -2);
        assert!(!err.is_end_of_stream());
    }

    #[test]
    fn display_includes_lengths() {
        let msg = DemuxError::LengthTooShort { needed: 12, actual: 3 }.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains('3'));
    }
}
