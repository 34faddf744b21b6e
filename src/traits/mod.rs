//! Core traits for data lake file system abstraction
//!
//! This module provides the capability contract every backend implements and
//! the value types it trades in.

pub mod file;
pub mod filesystem;
pub mod metadata;


pub use file::{FileHandle, OpenMode};
pub use filesystem::{EntryStream, FileSystem};
pub use metadata::{DirEntry, FileInfo, FileType};
