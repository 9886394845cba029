use std::io;

use crate::interceptor::Interceptor;
use crate::stream::{Source, Status, Transfer};
use crate::StreamError;

/// Window used by `io::Read` when the caller's buffer is too small for the
/// interceptor to produce even one unit.
const SPILL_SIZE: usize = 64;

/// Binds a [`Source`] to an [`Interceptor`]; every pull is delegated to
/// [`Interceptor::intercept_read`].
///
/// The reader is itself a [`Source`], so readers nest into arbitrary linear
/// chains, and it implements [`std::io::Read`] for everything else.
#[derive(Debug)]
pub struct InterceptingReader<S, I> {
    source: S,
    interceptor: I,
    // Status held back by `io::Read` because bytes came with it.
    pending: Option<Status>,
    // Output produced for an `io::Read` window too small to take it.
    spill: Vec<u8>,
    spill_pos: usize,
}

impl<S: Source, I: Interceptor> InterceptingReader<S, I> {
    pub fn new(source: S, interceptor: I) -> Self {
        InterceptingReader {
            source,
            interceptor,
            pending: None,
            spill: Vec::new(),
            spill_pos: 0,
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.source
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn interceptor(&self) -> &I {
        &self.interceptor
    }

    pub fn interceptor_mut(&mut self) -> &mut I {
        &mut self.interceptor
    }

    pub fn into_inner(self) -> (S, I) {
        (self.source, self.interceptor)
    }
}

impl<S: Source, I: Interceptor> Source for InterceptingReader<S, I> {
    fn pull(&mut self, buf: &mut [u8]) -> Transfer {
        if self.spill_pos < self.spill.len() {
            return Transfer::open(self.drain_spill(buf));
        }
        if let Some(status) = self.pending.take() {
            return Transfer { count: 0, status };
        }
        self.interceptor.intercept_read(&mut self.source, buf)
    }
}

impl<S: Source, I: Interceptor> InterceptingReader<S, I> {
    fn read_transfer(
        &mut self,
        buf: &mut [u8],
    ) -> std::result::Result<usize, StreamError> {
        loop {
            let Transfer { count, status } = self.pull(buf);
            match status {
                Status::Open if count == 0 => continue,
                Status::Open => return Ok(count),
                Status::Ended => {
                    if count > 0 {
                        self.pending = Some(Status::Ended);
                    }
                    return Ok(count);
                }
                Status::Failed(e) if count > 0 => {
                    log::debug!("deferring read failure after {count} bytes");
                    self.pending = Some(Status::Failed(e));
                    return Ok(count);
                }
                Status::Failed(e) => return Err(e),
            }
        }
    }

    fn drain_spill(&mut self, buf: &mut [u8]) -> usize {
        let available = &self.spill[self.spill_pos..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.spill_pos += n;
        n
    }
}

/// `io::Read` cannot return bytes and an error together, so a failure that
/// arrives with data is held back and returned by the next call. A pull that
/// produced nothing but left the stream open (a filter discarding a whole
/// read) is retried rather than reported as `Ok(0)`.
///
/// When the caller's buffer cannot hold a single converted unit, the reader
/// pulls into its own small window and hands the output out over the
/// following calls.
impl<S: Source, I: Interceptor> io::Read for InterceptingReader<S, I> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.spill_pos < self.spill.len() {
            return Ok(self.drain_spill(buf));
        }
        match self.read_transfer(buf) {
            Err(StreamError::WindowTooSmall(window)) => {
                log::trace!("spilling a read into a {window} byte window");
                let mut spill = std::mem::take(&mut self.spill);
                spill.resize(SPILL_SIZE, 0);
                let produced = self.read_transfer(&mut spill);
                spill.truncate(produced.as_ref().map_or(0, |n| *n));
                self.spill = spill;
                self.spill_pos = 0;
                produced?;
                Ok(self.drain_spill(buf))
            }
            other => Ok(other?),
        }
    }
}
