//! Open modes and materialized read handles
//!
//! Both backends download the whole object before handing it back, so a
//! [`FileHandle`] is an in-memory cursor. Dropping it releases the buffer;
//! there is no network resource left to leak.

use crate::error::{FsError, Result};
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};
use std::str::FromStr;

/// Read-only open mode
///
/// Parsed from the conventional mode strings: every character must be `r`
/// or `b`. A mode containing `b` is binary, anything else is text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// UTF-8 decoded content
    Text,
    /// Raw bytes
    Binary,
}

impl OpenMode {
    #[must_use]
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Binary)
    }
}

impl FromStr for OpenMode {
    type Err = FsError;

    fn from_str(mode: &str) -> Result<Self> {
        if let Some(bad) = mode.chars().find(|c| !matches!(c, 'r' | 'b')) {
            return Err(FsError::InvalidArgument(format!(
                "Unsupported file open mode '{bad}'"
            )));
        }
        if mode.contains('b') {
            Ok(Self::Binary)
        } else {
            Ok(Self::Text)
        }
    }
}

/// Readable handle over fully downloaded content, positioned at offset 0
///
/// Text handles hold content that has already been validated as UTF-8,
/// so `read_to_string` and `lines()` cannot fail on decoding.
#[derive(Debug)]
pub enum FileHandle {
    /// Raw bytes
    Binary(Cursor<Vec<u8>>),
    /// Decoded text
    Text(Cursor<String>),
}

impl FileHandle {
    /// Wrap downloaded bytes according to the open mode
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Decode`] if a text handle is requested for content
    /// that is not valid UTF-8.
    pub fn from_bytes(bytes: Vec<u8>, mode: OpenMode) -> Result<Self> {
        match mode {
            OpenMode::Binary => Ok(Self::Binary(Cursor::new(bytes))),
            OpenMode::Text => String::from_utf8(bytes)
                .map(|text| Self::Text(Cursor::new(text)))
                .map_err(|e| FsError::Decode(format!("Content is not valid UTF-8: {e}"))),
        }
    }

    /// Empty handle, used when the object has zero length
    #[must_use]
    pub fn empty(mode: OpenMode) -> Self {
        match mode {
            OpenMode::Binary => Self::Binary(Cursor::new(Vec::new())),
            OpenMode::Text => Self::Text(Cursor::new(String::new())),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> OpenMode {
        match self {
            Self::Binary(_) => OpenMode::Binary,
            Self::Text(_) => OpenMode::Text,
        }
    }

    /// Total content length in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Binary(cursor) => cursor.get_ref().len(),
            Self::Text(cursor) => cursor.get_ref().len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consume the handle and return the whole content regardless of position
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Binary(cursor) => cursor.into_inner(),
            Self::Text(cursor) => cursor.into_inner().into_bytes(),
        }
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Binary(cursor) => cursor.read(buf),
            Self::Text(cursor) => cursor.read(buf),
        }
    }
}

impl BufRead for FileHandle {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Binary(cursor) => cursor.fill_buf(),
            Self::Text(cursor) => cursor.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            Self::Binary(cursor) => cursor.consume(amt),
            Self::Text(cursor) => cursor.consume(amt),
        }
    }
}

impl Seek for FileHandle {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Binary(cursor) => cursor.seek(pos),
            Self::Text(cursor) => cursor.seek(pos),
        }
    }
}
