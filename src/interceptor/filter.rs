use crate::stream::{Sink, Source, Transfer};
use crate::table::{BytePredicate, FilterTable};

use super::Interceptor;

/// Drops every byte the predicate rejects, compacting the retained bytes to
/// the front of the caller's buffer in their original order.
///
/// Both paths report filtered lengths: a read returns how many retained
/// bytes now lead the buffer, a write returns how many retained bytes the
/// sink accepted.
#[derive(Debug, Clone)]
pub struct ByteFilter<P> {
    predicate: P,
}

impl<P: BytePredicate> ByteFilter<P> {
    pub fn new(predicate: P) -> Self {
        ByteFilter { predicate }
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }
}

impl ByteFilter<FilterTable> {
    /// Filter backed by a table compiled from `predicate`, which must be
    /// pure (see [`crate::table`]).
    pub fn compiled(predicate: impl BytePredicate) -> Self {
        ByteFilter::new(FilterTable::compile(predicate))
    }

    /// Strips whitespace, control and non-ASCII bytes.
    pub fn ascii_graphic() -> Self {
        ByteFilter::new(FilterTable::ascii_graphic())
    }
}

/// Move the retained bytes of `buf` to its front, returning how many there
/// are. Bytes past that prefix are left in an unspecified order.
fn compact<P>(predicate: &mut P, buf: &mut [u8]) -> usize
where
    P: BytePredicate + ?Sized,
{
    let mut kept = 0;
    for i in 0..buf.len() {
        let byte = buf[i];
        if predicate.retain(byte) {
            buf[kept] = byte;
            kept += 1;
        }
    }
    kept
}

impl<P: BytePredicate> Interceptor for ByteFilter<P> {
    fn intercept_read(
        &mut self,
        source: &mut dyn Source,
        buf: &mut [u8],
    ) -> Transfer {
        let pulled = source.pull(buf);
        if pulled.is_failed() {
            return pulled.with_count(0);
        }
        let read = pulled.count.min(buf.len());
        let kept = compact(&mut self.predicate, &mut buf[..read]);
        log::trace!("filter kept {} of {} bytes read", kept, read);
        pulled.with_count(kept)
    }

    fn intercept_write(
        &mut self,
        sink: &mut dyn Sink,
        buf: &mut [u8],
    ) -> Transfer {
        let kept = compact(&mut self.predicate, buf);
        log::trace!("filter kept {} of {} bytes written", kept, buf.len());
        sink.push(&mut buf[..kept])
    }
}
