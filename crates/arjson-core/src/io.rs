//! Reading whole documents into arena storage
//!
//! The input bytes are copied into the arena before parsing, so the returned
//! tree depends on the arena alone and zero-copy strings stay valid for as
//! long as the arena does.

use crate::{
    error::{Error, ErrorCode, ParseError, Result},
    memory::Arena,
    parser::{self, value::Node},
};
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

/// Label used in I/O errors raised by [`read_to_arena`]
const STREAM_LABEL: &str = "<stream>";

/// Read and parse a whole file
///
/// Open and read failures are reported as [`Error::Io`]; a file too large to
/// address in memory is a parse error with code [`ErrorCode::OutOfMemory`].
pub fn read_file_to_arena<'a>(path: impl AsRef<Path>, arena: &'a Arena) -> Result<&'a Node<'a>> {
    let path = path.as_ref();
    let io_error = |source: io::Error| {
        tracing::warn!(path = %path.display(), error = %source, "failed to read input file");
        Error::io(path, source)
    };

    let mut file = File::open(path).map_err(io_error)?;
    let len = file.metadata().map_err(io_error)?.len();
    let len = usize::try_from(len).map_err(|_| {
        ParseError::with_message(ErrorCode::OutOfMemory, 0, "file too large to load into memory")
    })?;

    let buffer = arena.alloc_bytes(len);
    file.read_exact(buffer).map_err(io_error)?;
    let buffer: &'a [u8] = buffer;
    Ok(parser::parse(buffer, arena)?)
}

/// Read a reader to its end and parse the bytes
pub fn read_to_arena<'a, R: Read>(mut reader: R, arena: &'a Arena) -> Result<&'a Node<'a>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|source| {
        tracing::warn!(error = %source, "failed to read input stream");
        Error::io(STREAM_LABEL, source)
    })?;
    let buffer: &'a [u8] = arena.alloc_slice_copy(&bytes);
    Ok(parser::parse(buffer, arena)?)
}
