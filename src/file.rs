use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::stream::{copy, IoSink, IoSource, Source};
use crate::Result;

/// A buffered [`Source`] over the file at `path`. The file is closed when
/// the source is dropped.
pub fn open<P: AsRef<Path>>(path: P) -> Result<IoSource<BufReader<File>>> {
    let file = File::open(path.as_ref())?;
    log::debug!("reading from {}", path.as_ref().display());
    Ok(IoSource::new(BufReader::new(file)))
}

/// Copy `source` until it ends into a newly created (or truncated) file at
/// `path`, returning the number of bytes written.
pub fn drain<S: Source, P: AsRef<Path>>(
    mut source: S,
    path: P,
) -> Result<u64> {
    let file = File::create(path.as_ref())?;
    let mut sink = IoSink::new(BufWriter::new(file));
    let written = copy(&mut source, &mut sink)?;
    log::debug!("drained {} bytes into {}", written, path.as_ref().display());
    Ok(written)
}
