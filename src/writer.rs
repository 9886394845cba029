use std::io;

use crate::interceptor::Interceptor;
use crate::stream::{Sink, Status, Transfer};
use crate::Result;

/// Binds a [`Sink`] to an [`Interceptor`]; every push is delegated to
/// [`Interceptor::intercept_write`].
///
/// Pushing through [`Sink`] transforms the caller's buffer in place. The
/// [`std::io::Write`] impl receives an immutable slice, so it copies each
/// write into a staging buffer owned by the writer and reused across calls.
#[derive(Debug)]
pub struct InterceptingWriter<S, I> {
    sink: S,
    interceptor: I,
    staging: Vec<u8>,
}

impl<S: Sink, I: Interceptor> InterceptingWriter<S, I> {
    pub fn new(sink: S, interceptor: I) -> Self {
        InterceptingWriter {
            sink,
            interceptor,
            staging: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &S {
        &self.sink
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn interceptor(&self) -> &I {
        &self.interceptor
    }

    pub fn interceptor_mut(&mut self) -> &mut I {
        &mut self.interceptor
    }

    pub fn into_inner(self) -> (S, I) {
        (self.sink, self.interceptor)
    }
}

impl<S: Sink, I: Interceptor> Sink for InterceptingWriter<S, I> {
    fn push(&mut self, buf: &mut [u8]) -> Transfer {
        self.interceptor.intercept_write(&mut self.sink, buf)
    }

    fn flush(&mut self) -> Result<()> {
        self.sink.flush()
    }
}

/// A successful intercepted write consumes the entire caller slice. A
/// failure is reported as `Err` even if part of the data reached the sink;
/// use [`Sink::push`] when exact partial accounting matters.
impl<S: Sink, I: Interceptor> io::Write for InterceptingWriter<S, I> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.staging.clear();
        self.staging.extend_from_slice(buf);
        let pushed = self
            .interceptor
            .intercept_write(&mut self.sink, &mut self.staging);
        match pushed.status {
            Status::Open => Ok(buf.len()),
            Status::Ended => Err(io::ErrorKind::WriteZero.into()),
            Status::Failed(e) => {
                log::debug!(
                    "intercepted write failed after {} bytes: {}",
                    pushed.count,
                    e
                );
                Err(e.into())
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(Sink::flush(self)?)
    }
}
