mod filter;
mod mapper;

use crate::stream::{Sink, Source, Transfer};

pub use filter::ByteFilter;
pub use mapper::ByteMapper;

/// A transformation stage sitting on a stream boundary.
///
/// Both operations perform the underlying I/O themselves and may rewrite the
/// caller's buffer in place before returning. They must never touch bytes
/// past `buf.len()`, and on the read side never past the count the source
/// actually produced.
pub trait Interceptor {
    /// Pull from `source` into `buf`, transform, and report the number of
    /// bytes left at the front of `buf` for the caller.
    fn intercept_read(
        &mut self,
        source: &mut dyn Source,
        buf: &mut [u8],
    ) -> Transfer;

    /// Transform `buf` and push the result into `sink`.
    ///
    /// Returning [`Status::Open`](crate::Status::Open) means the whole of
    /// `buf` has been disposed of.
    fn intercept_write(&mut self, sink: &mut dyn Sink, buf: &mut [u8])
        -> Transfer;
}

impl<I: Interceptor + ?Sized> Interceptor for &mut I {
    fn intercept_read(
        &mut self,
        source: &mut dyn Source,
        buf: &mut [u8],
    ) -> Transfer {
        (**self).intercept_read(source, buf)
    }

    fn intercept_write(
        &mut self,
        sink: &mut dyn Sink,
        buf: &mut [u8],
    ) -> Transfer {
        (**self).intercept_write(sink, buf)
    }
}

impl<I: Interceptor + ?Sized> Interceptor for Box<I> {
    fn intercept_read(
        &mut self,
        source: &mut dyn Source,
        buf: &mut [u8],
    ) -> Transfer {
        (**self).intercept_read(source, buf)
    }

    fn intercept_write(
        &mut self,
        sink: &mut dyn Sink,
        buf: &mut [u8],
    ) -> Transfer {
        (**self).intercept_write(sink, buf)
    }
}

/// Passes bytes through untouched while tallying how many crossed the
/// boundary in either direction.
#[derive(Debug, Default, Clone)]
pub struct ByteCounter {
    bytes: u64,
}

impl ByteCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.bytes
    }
}

impl Interceptor for ByteCounter {
    fn intercept_read(
        &mut self,
        source: &mut dyn Source,
        buf: &mut [u8],
    ) -> Transfer {
        let pulled = source.pull(buf);
        self.bytes += pulled.count as u64;
        pulled
    }

    fn intercept_write(
        &mut self,
        sink: &mut dyn Sink,
        buf: &mut [u8],
    ) -> Transfer {
        let pushed = sink.push(buf);
        self.bytes += pushed.count as u64;
        pushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::testing::{RecordingSink, ScriptedSource, Step};
    use std::io;

    #[test]
    fn counter_tallies_partial_reads() {
        let mut source = ScriptedSource::new(vec![
            Step::Data(b"abc"),
            Step::DataThenFail(b"de", io::ErrorKind::TimedOut),
        ]);
        let mut counter = ByteCounter::new();
        let mut buf = [0u8; 8];

        assert!(counter.intercept_read(&mut source, &mut buf).is_open());
        let second = counter.intercept_read(&mut source, &mut buf);
        assert!(second.is_failed());
        assert_eq!(second.count, 2);
        assert_eq!(counter.count(), 5);
    }

    #[test]
    fn counter_tallies_only_accepted_writes() {
        let mut sink = RecordingSink::failing_after(6);
        let mut counter = ByteCounter::new();

        let mut first = *b"1234";
        assert!(counter.intercept_write(&mut sink, &mut first).is_open());
        let mut second = *b"5678";
        let pushed = counter.intercept_write(&mut sink, &mut second);
        assert!(pushed.is_failed());
        assert_eq!(counter.count(), 6);
        assert_eq!(sink.data, b"123456");
    }

    #[test]
    fn boxed_interceptors_dispatch_dynamically() {
        let mut stage: Box<dyn Interceptor> = Box::new(ByteCounter::new());
        let mut sink = RecordingSink::default();
        let mut buf = *b"boxed";
        let pushed = stage.intercept_write(&mut sink, &mut buf);
        assert_eq!(pushed.count, 5);
        assert_eq!(sink.data, b"boxed");
    }
}
