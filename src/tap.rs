use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::stream::{Source, Transfer};
use crate::Result;

/// A [`Source`] that copies every byte it delivers into a side channel.
///
/// The side channel is flushed and dropped as soon as the wrapped source
/// reports end-of-stream, which closes it when it is a file.
#[derive(Debug)]
pub struct TapReader<S, W: Write> {
    source: S,
    tap: Option<W>,
    tapped: u64,
    ended: bool,
}

impl<S: Source, W: Write> TapReader<S, W> {
    pub fn new(source: S, tap: W) -> Self {
        TapReader {
            source,
            tap: Some(tap),
            tapped: 0,
            ended: false,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// The side channel, or `None` once it has been released.
    pub fn tap(&self) -> Option<&W> {
        self.tap.as_ref()
    }

    /// Number of bytes copied into the side channel so far.
    pub fn tapped(&self) -> u64 {
        self.tapped
    }

    pub fn into_inner(self) -> (S, Option<W>) {
        (self.source, self.tap)
    }

    fn record(&mut self, bytes: &[u8]) -> Result<()> {
        if let Some(tap) = self.tap.as_mut() {
            tap.write_all(bytes)?;
            self.tapped += bytes.len() as u64;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if let Some(mut tap) = self.tap.take() {
            tap.flush()?;
            log::info!("tap released after {} bytes", self.tapped);
        }
        Ok(())
    }
}

impl<S: Source, W: Write> Source for TapReader<S, W> {
    fn pull(&mut self, buf: &mut [u8]) -> Transfer {
        if self.ended {
            return Transfer::ended(0);
        }
        let pulled = self.source.pull(buf);
        let count = pulled.count.min(buf.len());
        let mut outcome = self.record(&buf[..count]);
        if pulled.is_ended() {
            // The side channel is released even when the last write failed.
            self.ended = true;
            outcome = outcome.and(self.release());
        }
        if let Err(e) = outcome {
            log::debug!("tap failed: {}", e);
            return Transfer::failed(count, e);
        }
        pulled
    }
}

/// Tap `source` into a newly created (or truncated) file at `path`.
pub fn file<S: Source, P: AsRef<Path>>(
    source: S,
    path: P,
) -> Result<TapReader<S, BufWriter<File>>> {
    let file = File::create(path.as_ref())?;
    log::debug!("tapping into {}", path.as_ref().display());
    Ok(TapReader::new(source, BufWriter::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::testing::{ScriptedSource, Step};
    use crate::IoSource;

    use std::fs;
    use std::io;
    use tempdir::TempDir;

    #[test]
    fn tap_sees_exactly_what_the_reader_sees() {
        let source = ScriptedSource::new(vec![
            Step::Data(b"one "),
            Step::DataThenEnd(b"two"),
        ]);
        let mut reader = TapReader::new(source, Vec::new());
        let mut buf = [0u8; 8];

        assert_eq!(reader.pull(&mut buf).count, 4);
        assert_eq!(reader.tap().unwrap(), b"one ");
        assert!(reader.pull(&mut buf).is_ended());
        assert!(reader.tap().is_none());
        assert_eq!(reader.tapped(), 7);
    }

    #[test]
    fn failing_tap_fails_the_pull_but_keeps_the_bytes() {
        struct Full;

        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let source = ScriptedSource::new(vec![Step::Data(b"xyz")]);
        let mut reader = TapReader::new(source, Full);
        let mut buf = [0u8; 4];

        let transfer = reader.pull(&mut buf);
        assert!(transfer.is_failed());
        assert_eq!(&buf[..transfer.count], b"xyz");
    }

    #[test]
    fn failing_tap_on_the_last_pull_still_ends_the_stream() {
        struct Full;

        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let source = ScriptedSource::new(vec![
            Step::DataThenEnd(b"end"),
            Step::Data(b"late"),
        ]);
        let mut reader = TapReader::new(source, Full);
        let mut buf = [0u8; 4];

        assert!(reader.pull(&mut buf).is_failed());
        assert!(reader.tap().is_none());
        let next = reader.pull(&mut buf);
        assert!(next.is_ended());
        assert_eq!(next.count, 0);
        assert_eq!(reader.get_ref().pulls, 1);
    }

    #[test]
    fn file_tap_is_complete_once_the_source_ends() {
        let dir = TempDir::new("bytestage").unwrap();
        let path = dir.path().join("tap.bin");

        let mut reader =
            file(IoSource::new(&b"tapped bytes"[..]), &path).unwrap();
        let mut out = Vec::new();
        crate::copy(&mut reader, &mut crate::IoSink::new(&mut out)).unwrap();

        assert!(reader.tap().is_none());
        assert_eq!(out, b"tapped bytes");
        assert_eq!(fs::read(&path).unwrap(), b"tapped bytes");
    }
}
