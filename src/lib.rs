//! dlfs - uniform async access to two generations of data lake storage
//!
//! Client code talks to a single [`FileSystem`] trait object and never learns
//! whether it is backed by the hierarchical Generation-1 store or the
//! flat-namespace Generation-2 store.
//!
//! ```rust,ignore
//! use dlfs::{backends, cli::StoreConfig, FileSystem};
//! use futures::TryStreamExt;
//!
//! async fn list_all(config: &StoreConfig, connector: &impl backends::Connector) -> dlfs::Result<()> {
//!     let fs = backends::connect(config, connector).await?;
//!     let entries: Vec<_> = fs.walk("/raw", true).try_collect().await?;
//!     for entry in entries {
//!         println!("{} {:?}", entry.path, entry.info);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adaptive_concurrency;
pub mod auth;
pub mod backends;
pub mod cli;
pub mod client;
pub mod error;
pub mod filesystem;
pub mod logging;
pub mod traits;

pub use error::{FsError, Result};
pub use traits::{DirEntry, EntryStream, FileHandle, FileInfo, FileSystem, FileType, OpenMode};
