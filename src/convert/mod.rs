//! Stages whose output length is not the input length.
//!
//! A [`Converter`] re-encodes bytes with a data-dependent ratio (hex doubles
//! them, hex decoding halves them). [`ChunkedConversion`] adapts any
//! converter to the [`Interceptor`] protocol by driving it through a fixed
//! scratch buffer, one chunk at a time.

pub mod hex;

use crate::interceptor::Interceptor;
use crate::stream::{Sink, Source, Status, Transfer};
use crate::{Result, StreamError};

const KILOBYTE: usize = 1024;

/// Default capacity of the scratch buffer owned by [`ChunkedConversion`].
pub const SCRATCH_SIZE: usize = KILOBYTE;

/// A byte transformation whose output length may differ from its input.
pub trait Converter {
    /// Convert all of `src` into a prefix of `dst`, returning how many bytes
    /// of `dst` were written.
    fn convert(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize>;

    /// Number of source bytes per conversion unit when at most `capacity`
    /// destination bytes are available. The returned length must convert
    /// into no more than `capacity` bytes and must not exceed `capacity`.
    ///
    /// For the full scratch capacity this must be at least 1. For smaller
    /// windows 0 means "not even one unit fits".
    fn chunk_size(&self, capacity: usize) -> usize;

    /// Largest number of source bytes whose converted output fits in
    /// `window` destination bytes, regardless of any scratch capacity.
    /// 0 means not even one unit fits.
    ///
    /// Defaults to `chunk_size(window)`. Converters that shrink their input
    /// override it to fill small windows.
    fn max_source_for(&self, window: usize) -> usize {
        self.chunk_size(window)
    }
}

impl<C: Converter + ?Sized> Converter for &mut C {
    fn convert(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        (**self).convert(dst, src)
    }

    fn chunk_size(&self, capacity: usize) -> usize {
        (**self).chunk_size(capacity)
    }

    fn max_source_for(&self, window: usize) -> usize {
        (**self).max_source_for(window)
    }
}

impl<C: Converter + ?Sized> Converter for Box<C> {
    fn convert(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        (**self).convert(dst, src)
    }

    fn chunk_size(&self, capacity: usize) -> usize {
        (**self).chunk_size(capacity)
    }

    fn max_source_for(&self, window: usize) -> usize {
        (**self).max_source_for(window)
    }
}

/// Interceptor that drives a [`Converter`] through a fixed scratch buffer.
///
/// On the write path the scratch buffer receives converted bytes before they
/// are pushed; progress is counted in caller bytes consumed. On the read path
/// it receives raw bytes from the source, which are converted straight into
/// the caller's buffer; progress is counted in converted bytes delivered.
///
/// The scratch buffer is owned by the instance and reused by every call, so
/// one instance must not serve overlapping operations.
#[derive(Debug)]
pub struct ChunkedConversion<C> {
    converter: C,
    scratch: Box<[u8]>,
}

impl<C: Converter> ChunkedConversion<C> {
    /// # Panics
    ///
    /// If the converter's chunk size for [`SCRATCH_SIZE`] is outside
    /// `1..=SCRATCH_SIZE`.
    pub fn new(converter: C) -> Self {
        Self::with_capacity(converter, SCRATCH_SIZE)
    }

    /// # Panics
    ///
    /// If the converter's chunk size for `capacity` is outside
    /// `1..=capacity`.
    pub fn with_capacity(converter: C, capacity: usize) -> Self {
        let chunk = converter.chunk_size(capacity);
        assert!(
            (1..=capacity).contains(&chunk),
            "chunk size {} out of bounds for a scratch capacity of {}",
            chunk,
            capacity
        );
        ChunkedConversion {
            converter,
            scratch: vec![0u8; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.scratch.len()
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn into_converter(self) -> C {
        self.converter
    }

    fn bounded_chunk(&self, capacity: usize) -> usize {
        let chunk = self.converter.chunk_size(capacity);
        assert!(
            chunk <= capacity,
            "chunk size {} overflows a capacity of {}",
            chunk,
            capacity
        );
        chunk
    }
}

impl<C: Converter> Interceptor for ChunkedConversion<C> {
    fn intercept_read(
        &mut self,
        source: &mut dyn Source,
        buf: &mut [u8],
    ) -> Transfer {
        let mut produced = 0;
        while produced < buf.len() {
            let window = buf.len() - produced;
            let chunk = self
                .converter
                .max_source_for(window)
                .min(self.bounded_chunk(self.scratch.len()));
            if chunk == 0 {
                if produced == 0 {
                    return Transfer::failed(
                        0,
                        StreamError::WindowTooSmall(window),
                    );
                }
                break;
            }

            let pulled = source.pull(&mut self.scratch[..chunk]);
            let ended = match pulled.status {
                Status::Open => false,
                Status::Ended => true,
                Status::Failed(e) => {
                    log::debug!(
                        "conversion read failed after {} bytes: {}",
                        produced,
                        e
                    );
                    return Transfer::failed(produced, e);
                }
            };

            let read = pulled.count.min(chunk);
            let converted = match self
                .converter
                .convert(&mut buf[produced..], &self.scratch[..read])
            {
                Ok(converted) => converted,
                Err(e) => return Transfer::failed(produced, e),
            };
            produced += converted;
            log::trace!(
                "converted {} source bytes into {} (total {})",
                read,
                converted,
                produced
            );

            if ended {
                log::debug!("source ended after {} converted bytes", produced);
                return Transfer::ended(produced);
            }
        }
        Transfer::open(produced)
    }

    fn intercept_write(
        &mut self,
        sink: &mut dyn Sink,
        buf: &mut [u8],
    ) -> Transfer {
        let chunk = self.bounded_chunk(self.scratch.len());
        let mut consumed = 0;
        for src in buf.chunks(chunk) {
            let converted =
                match self.converter.convert(&mut self.scratch, src) {
                    Ok(converted) => converted,
                    Err(e) => return Transfer::failed(consumed, e),
                };
            let pushed = sink.push(&mut self.scratch[..converted]);
            consumed += src.len();
            log::trace!(
                "converted {} caller bytes into {} (total {})",
                src.len(),
                converted,
                consumed
            );
            if let Status::Failed(e) = pushed.status {
                log::debug!(
                    "conversion write failed after {} bytes: {}",
                    consumed,
                    e
                );
                return Transfer::failed(consumed, e);
            }
        }
        Transfer::open(consumed)
    }
}
