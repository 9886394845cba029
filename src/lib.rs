//! Composable, in-place byte-stream transformations.
//!
//! An [`Interceptor`] sits on the boundary of a [`Source`] or [`Sink`] and
//! rewrites the bytes crossing it. [`InterceptingReader`] and
//! [`InterceptingWriter`] bind an interceptor to a stream and are streams
//! themselves, so stages chain into linear pipelines:
//!
//! ```
//! use std::io::Read;
//! use bytestage::{ByteFilter, ByteMapper, InterceptingReader, IoSource};
//!
//! let source = IoSource::new("Hello, World".as_bytes());
//! let no_commas = InterceptingReader::new(
//!     source,
//!     ByteFilter::compiled(|b: u8| b != b','),
//! );
//! let mut lower = InterceptingReader::new(
//!     no_commas,
//!     ByteMapper::compiled(|b: u8| b.to_ascii_lowercase()),
//! );
//!
//! let mut out = String::new();
//! lower.read_to_string(&mut out).unwrap();
//! assert_eq!(out, "hello world");
//! ```
//!
//! Transformations that change the length of the data, like the hex codec
//! in [`convert::hex`], implement [`Converter`] and run through
//! [`ChunkedConversion`].

#[macro_use]
extern crate lazy_static;

pub mod convert;
mod errors;
pub mod file;
mod interceptor;
mod reader;
mod stream;
pub mod table;
pub mod tap;
mod writer;

pub use convert::{ChunkedConversion, Converter, SCRATCH_SIZE};
pub use errors::{Result, StreamError};
pub use interceptor::{ByteCounter, ByteFilter, ByteMapper, Interceptor};
pub use reader::InterceptingReader;
pub use stream::{
    copy, IoSink, IoSource, Sink, Source, Status, Transfer, COPY_BUFFER_SIZE,
};
pub use table::{ByteMap, BytePredicate, FilterTable, MapTable};
pub use writer::InterceptingWriter;
