use crate::stream::{Sink, Source, Transfer};
use crate::table::{ByteMap, MapTable};

use super::Interceptor;

/// Rewrites every byte crossing the boundary through a [`ByteMap`], in
/// place. Counts are never changed.
#[derive(Debug, Clone)]
pub struct ByteMapper<M> {
    map: M,
}

impl<M: ByteMap> ByteMapper<M> {
    pub fn new(map: M) -> Self {
        ByteMapper { map }
    }

    pub fn byte_map(&self) -> &M {
        &self.map
    }

    fn remap(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = self.map.map(*byte);
        }
    }
}

impl ByteMapper<MapTable> {
    /// Mapper backed by a table compiled from `map`, which must be pure
    /// (see [`crate::table`]).
    pub fn compiled(map: impl ByteMap) -> Self {
        ByteMapper::new(MapTable::compile(map))
    }
}

impl<M: ByteMap> Interceptor for ByteMapper<M> {
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
        self.remap(&mut buf[..read]);
        pulled
    }

    fn intercept_write(
        &mut self,
        sink: &mut dyn Sink,
        buf: &mut [u8],
    ) -> Transfer {
        self.remap(buf);
        sink.push(buf)
    }
}
