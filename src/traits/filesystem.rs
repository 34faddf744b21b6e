//! FileSystem trait for uniform data lake access
//!
//! This trait provides a single interface that both backend generations
//! implement identically, so calling code holds a `Box<dyn FileSystem>` and
//! never branches on which store is in use.

use crate::error::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

use super::{DirEntry, FileHandle, FileInfo};

/// Lazy sequence of listing results
///
/// Nothing is requested from the store until the stream is first polled.
/// The first error ends the stream. Each call to `ls`/`walk` issues fresh
/// requests; streams cannot be restarted.
pub type EntryStream<'a> = BoxStream<'a, Result<DirEntry>>;

/// Read-only file system over a remote store
///
/// Implementations own their client handles and keep no mutable state, so a
/// single instance can be shared (e.g. behind an `Arc`) by concurrent readers.
///
/// # Examples
///
/// ```rust,ignore
/// let fs: Box<dyn FileSystem> = backends::connect(&config, &connector).await?;
/// if fs.is_file("/raw/2020/data.csv").await? {
///     let mut handle = fs.open("/raw/2020/data.csv", "r").await?;
///     let mut text = String::new();
///     handle.read_to_string(&mut text)?;
/// }
/// ```
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Backend-specific identifier (store name or account name)
    fn name(&self) -> &str;

    /// Open a file for reading and download its full content
    ///
    /// # Parameters
    ///
    /// * `path` - Path to the file
    /// * `mode` - `"r"` for text or `"rb"` for bytes; only `r` and `b` are accepted
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - `mode` contains anything other than `r` or `b` (`InvalidArgument`)
    /// - The path does not exist (`NotFound`)
    /// - Text mode was requested for content that is not UTF-8 (`Decode`)
    /// - The collaborator fails (`Authentication` / `Transport`)
    async fn open(&self, path: &str, mode: &str) -> Result<FileHandle>;

    /// Check whether a path exists
    ///
    /// A missing path is `Ok(false)`; every other failure propagates.
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` on authentication or transport failures.
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Fetch normalized metadata for a path
    ///
    /// # Errors
    ///
    /// Returns `Err(FsError)` if:
    /// - The path does not exist (`NotFound`)
    /// - The backend reports an unrecognized entry type (`Decode`)
    /// - The collaborator fails (`Authentication` / `Transport`)
    async fn info(&self, path: &str) -> Result<FileInfo>;

    /// Check whether a path is an existing file
    ///
    /// Backed by a single `info` call; a missing path is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Propagates every `info` error except `NotFound`.
    async fn is_file(&self, path: &str) -> Result<bool> {
        match self.info(path).await {
            Ok(info) => Ok(info.is_file()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Check whether a path is an existing directory
    ///
    /// Backed by a single `info` call; a missing path is `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Propagates every `info` error except `NotFound`.
    async fn is_dir(&self, path: &str) -> Result<bool> {
        match self.info(path).await {
            Ok(info) => Ok(info.is_dir()),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// List the immediate children of `path`
    ///
    /// With `with_info == false` every entry's `info` is `None` and no
    /// per-entry metadata is fetched.
    fn ls<'a>(&'a self, path: &'a str, with_info: bool) -> EntryStream<'a>;

    /// List every descendant of `base_path`, files and directories alike
    ///
    /// Order is backend-specific but deterministic for a given listing.
    fn walk<'a>(&'a self, base_path: &'a str, with_info: bool) -> EntryStream<'a>;
}
