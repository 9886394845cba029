use std::io::{self, Read, Write};

use crate::{Result, StreamError};

const KILOBYTE: usize = 1024;

/// Size of the intermediate buffer used by [`copy`].
pub const COPY_BUFFER_SIZE: usize = 8 * KILOBYTE;

/// How a single pull or push ended.
#[derive(Debug)]
pub enum Status {
    /// The stream may deliver or accept more bytes.
    Open,
    /// No further bytes will be produced. Sources may report this together
    /// with a non-zero count on their last pull.
    Ended,
    /// The operation failed after moving `count` bytes.
    Failed(StreamError),
}

/// Outcome of one pull from a [`Source`] or one push into a [`Sink`]:
/// the number of bytes moved and what happened to the stream.
///
/// Partial success is normal, a transfer can carry both a count and a
/// failure.
#[derive(Debug)]
#[must_use]
pub struct Transfer {
    pub count: usize,
    pub status: Status,
}

impl Transfer {
    pub fn open(count: usize) -> Self {
        Transfer {
            count,
            status: Status::Open,
        }
    }

    pub fn ended(count: usize) -> Self {
        Transfer {
            count,
            status: Status::Ended,
        }
    }

    pub fn failed(count: usize, error: impl Into<StreamError>) -> Self {
        Transfer {
            count,
            status: Status::Failed(error.into()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.status, Status::Open)
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.status, Status::Ended)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, Status::Failed(_))
    }

    pub fn error(&self) -> Option<&StreamError> {
        match &self.status {
            Status::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Replace the count, keeping the status.
    pub fn with_count(self, count: usize) -> Self {
        Transfer {
            count,
            status: self.status,
        }
    }

    /// Drop the partial count of a failed transfer.
    pub fn into_result(self) -> Result<usize> {
        match self.status {
            Status::Failed(e) => Err(e),
            _ => Ok(self.count),
        }
    }
}

/// A readable byte stream.
pub trait Source {
    /// Fill a prefix of `buf` and report how many bytes were produced.
    fn pull(&mut self, buf: &mut [u8]) -> Transfer;
}

/// A writable byte stream.
///
/// `push` takes the buffer mutably so that write-side stages can transform
/// it in place; a sink must never touch bytes beyond `buf.len()`.
pub trait Sink {
    /// Accept all of `buf`, or report how many bytes were accepted before
    /// failing. `Status::Open` implies `count == buf.len()`.
    fn push(&mut self, buf: &mut [u8]) -> Transfer;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    fn pull(&mut self, buf: &mut [u8]) -> Transfer {
        (**self).pull(buf)
    }
}

impl<S: Source + ?Sized> Source for Box<S> {
    fn pull(&mut self, buf: &mut [u8]) -> Transfer {
        (**self).pull(buf)
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn push(&mut self, buf: &mut [u8]) -> Transfer {
        (**self).push(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn push(&mut self, buf: &mut [u8]) -> Transfer {
        (**self).push(buf)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// [`Source`] over any [`std::io::Read`].
///
/// `Ok(0)` from a non-empty read is reported as [`Status::Ended`].
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        IoSource { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Source for IoSource<R> {
    fn pull(&mut self, buf: &mut [u8]) -> Transfer {
        if buf.is_empty() {
            return Transfer::open(0);
        }
        match self.inner.read(buf) {
            Ok(0) => Transfer::ended(0),
            Ok(n) => Transfer::open(n),
            Err(e) => Transfer::failed(0, e),
        }
    }
}

/// [`Sink`] over any [`std::io::Write`].
///
/// A push keeps writing until the whole buffer is accepted; a writer that
/// accepts nothing fails the push with [`io::ErrorKind::WriteZero`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        IoSink { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Sink for IoSink<W> {
    fn push(&mut self, buf: &mut [u8]) -> Transfer {
        let mut written = 0;
        while written < buf.len() {
            match self.inner.write(&buf[written..]) {
                Ok(0) => {
                    return Transfer::failed(
                        written,
                        io::Error::from(io::ErrorKind::WriteZero),
                    )
                }
                Ok(n) => written += n,
                Err(e) => return Transfer::failed(written, e),
            }
        }
        Transfer::open(written)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.inner.flush()?)
    }
}

/// Pump `source` into `sink` until the source ends, then flush the sink.
/// Returns the number of bytes the sink accepted.
pub fn copy<S, K>(source: &mut S, sink: &mut K) -> Result<u64>
where
    S: Source + ?Sized,
    K: Sink + ?Sized,
{
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total: u64 = 0;
    loop {
        let pulled = source.pull(&mut buf);
        if pulled.count > 0 {
            let pushed = sink.push(&mut buf[..pulled.count]);
            total += pushed.count as u64;
            if let Status::Failed(e) = pushed.status {
                log::debug!("copy stopped after {} bytes: {}", total, e);
                return Err(e);
            }
        }
        match pulled.status {
            Status::Open => continue,
            Status::Ended => break,
            Status::Failed(e) => {
                log::debug!("copy stopped after {} bytes: {}", total, e);
                return Err(e);
            }
        }
    }
    sink.flush()?;
    log::trace!("copied {} bytes", total);
    Ok(total)
}
