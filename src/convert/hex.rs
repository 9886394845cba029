//! Lowercase hexadecimal encoding and decoding as chunked conversions.

use crate::reader::InterceptingReader;
use crate::stream::{Sink, Source};
use crate::writer::InterceptingWriter;
use crate::{Result, StreamError};

use super::{ChunkedConversion, Converter};

/// Every source byte becomes two lowercase hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder;

/// Every pair of hex digits (either case) becomes one byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder;

impl Converter for Encoder {
    fn convert(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        let len = src.len() * 2;
        if dst.len() < len {
            return Err(StreamError::WindowTooSmall(dst.len()));
        }
        ::hex::encode_to_slice(src, &mut dst[..len])?;
        Ok(len)
    }

    fn chunk_size(&self, capacity: usize) -> usize {
        capacity / 2
    }
}

impl Converter for Decoder {
    fn convert(&mut self, dst: &mut [u8], src: &[u8]) -> Result<usize> {
        if src.len() % 2 != 0 {
            return Err(::hex::FromHexError::OddLength.into());
        }
        let len = src.len() / 2;
        if dst.len() < len {
            return Err(StreamError::WindowTooSmall(dst.len()));
        }
        ::hex::decode_to_slice(src, &mut dst[..len])?;
        Ok(len)
    }

    fn chunk_size(&self, capacity: usize) -> usize {
        capacity & !1
    }

    fn max_source_for(&self, window: usize) -> usize {
        window.saturating_mul(2)
    }
}

pub fn encoding_reader<S: Source>(
    source: S,
) -> InterceptingReader<S, ChunkedConversion<Encoder>> {
    InterceptingReader::new(source, ChunkedConversion::new(Encoder))
}

pub fn encoding_writer<S: Sink>(
    sink: S,
) -> InterceptingWriter<S, ChunkedConversion<Encoder>> {
    InterceptingWriter::new(sink, ChunkedConversion::new(Encoder))
}

pub fn decoding_reader<S: Source>(
    source: S,
) -> InterceptingReader<S, ChunkedConversion<Decoder>> {
    InterceptingReader::new(source, ChunkedConversion::new(Decoder))
}

pub fn decoding_writer<S: Sink>(
    sink: S,
) -> InterceptingWriter<S, ChunkedConversion<Decoder>> {
    InterceptingWriter::new(sink, ChunkedConversion::new(Decoder))
}
