use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreamError>;

/// Failures surfaced by sources, sinks, interceptors and converters.
///
/// End-of-stream is not an error and has no variant here, see
/// [`Status::Ended`](crate::Status::Ended).
#[derive(Error, Debug)]
pub enum StreamError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Hex conversion error: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("Destination window of {0} bytes cannot hold a converted chunk")]
    WindowTooSmall(usize),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StreamError {
    /// The [`io::ErrorKind`] this failure maps to when it crosses into
    /// `std::io`.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            StreamError::Io(e) => e.kind(),
            StreamError::Hex(_) => io::ErrorKind::InvalidData,
            StreamError::WindowTooSmall(_) => io::ErrorKind::InvalidInput,
            StreamError::Other(_) => io::ErrorKind::Other,
        }
    }
}

impl From<StreamError> for io::Error {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Io(e) => e,
            other => io::Error::new(other.kind(), other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_round_trip_unchanged() {
        let original = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        let back: io::Error = StreamError::from(original).into();
        assert_eq!(back.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(back.to_string(), "gone");
    }

    #[test]
    fn conversion_errors_become_invalid_data() {
        let e: io::Error =
            StreamError::from(hex::FromHexError::OddLength).into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);
        assert!(e.to_string().contains("Hex conversion error"));
    }

    #[test]
    fn other_errors_keep_their_message() {
        let e = StreamError::from(anyhow::anyhow!("custom converter failed"));
        assert_eq!(e.to_string(), "custom converter failed");
        assert_eq!(e.kind(), io::ErrorKind::Other);
    }
}
