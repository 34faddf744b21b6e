//! File metadata model shared by every backend
//!
//! [`FileInfo`] is the normalized description of one store entry. Backends
//! translate their collaborator's native metadata into it; callers never see
//! the raw shapes.

use crate::error::{FsError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entry in the store
///
/// Only files and directories exist. Any other type tag reported by a
/// backend is rejected with [`FsError::Decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileType {
    /// Regular file
    File,
    /// Directory
    Directory,
}

impl FileType {
    /// Tag used by the stores on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "FILE",
            Self::Directory => "DIRECTORY",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FILE" => Ok(Self::File),
            "DIRECTORY" => Ok(Self::Directory),
            other => Err(FsError::Decode(format!("Unsupported file type '{other}'"))),
        }
    }
}

/// Normalized metadata for a single entry
///
/// Timestamps are `None` when the backend did not report them; absence is
/// never encoded as the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// File or directory
    pub file_type: FileType,
    /// Length in bytes as reported by the backend (0 for directories)
    pub size: u64,
    /// Last access time, UTC
    pub access_time: Option<DateTime<Utc>>,
    /// Last modification time, UTC
    pub modify_time: Option<DateTime<Utc>>,
    /// Creation time, UTC
    pub create_time: Option<DateTime<Utc>>,
}

impl FileInfo {
    /// Create metadata with no timestamps
    #[must_use]
    pub const fn new(file_type: FileType, size: u64) -> Self {
        Self {
            file_type,
            size,
            access_time: None,
            modify_time: None,
            create_time: None,
        }
    }

    /// Set the access time
    #[must_use]
    pub const fn with_access_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.access_time = time;
        self
    }

    /// Set the modification time
    #[must_use]
    pub const fn with_modify_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.modify_time = time;
        self
    }

    /// Set the creation time
    #[must_use]
    pub const fn with_create_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.create_time = time;
        self
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::File
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }
}

/// One item produced by `ls` or `walk`: a path and, when requested, its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Path as reported by the backend
    pub path: String,
    /// Metadata, `None` when listing without info
    pub info: Option<FileInfo>,
}

impl DirEntry {
    #[must_use]
    pub fn new(path: impl Into<String>, info: Option<FileInfo>) -> Self {
        Self {
            path: path.into(),
            info,
        }
    }
}
