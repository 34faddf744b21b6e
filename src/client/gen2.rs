//! Generation-2 (flat namespace) client seam
//!
//! The newer store hands out one client object per path for property
//! fetches and chunked downloads, plus a container-level path listing.

use crate::auth::Credentials;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Metadata key the store sets on directory placeholders
pub const FOLDER_METADATA_KEY: &str = "hdi_isfolder";

/// Content settings attached to a path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentSettings {
    /// MIME type; directories carry none
    pub content_type: Option<String>,
}

/// Result of a property fetch on a single path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileProperties {
    pub size: u64,
    pub content_settings: ContentSettings,
    pub last_modified: Option<DateTime<Utc>>,
    pub creation_time: Option<DateTime<Utc>>,
    /// User and system metadata pairs
    pub metadata: HashMap<String, String>,
}

/// One row of a path listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathProperties {
    pub name: String,
    pub is_directory: bool,
    pub content_length: u64,
}

impl PathProperties {
    #[must_use]
    pub fn new(name: impl Into<String>, is_directory: bool, content_length: u64) -> Self {
        Self {
            name: name.into(),
            is_directory,
            content_length,
        }
    }
}

/// Per-path client
///
/// A missing path is reported as [`crate::FsError::NotFound`].
#[async_trait]
pub trait Gen2FileClient: Send + Sync {
    /// Fetch properties of the path this client is bound to
    async fn get_file_properties(&self) -> Result<FileProperties>;

    /// Download the whole object using up to `max_concurrency` parallel workers
    async fn download_file(&self, max_concurrency: usize) -> Result<Vec<u8>>;
}

/// Flat-namespace container client
#[async_trait]
pub trait Gen2Client: Send + Sync {
    /// Per-path client type
    type File: Gen2FileClient;

    /// Bind a client to `path`; no request is issued
    fn get_file_client(&self, path: &str) -> Self::File;

    /// List paths under `path`, descending into subdirectories when `recursive`
    async fn get_paths(&self, path: &str, recursive: bool) -> Result<Vec<PathProperties>>;
}

/// Authenticates and builds a [`Gen2Client`] for an account's file system
#[async_trait]
pub trait Gen2Connector: Send + Sync {
    /// Client produced by this connector
    type Gen2: Gen2Client + 'static;

    /// Acquire a credential and bind a client to `account_name`/`file_system_name`
    async fn connect_gen2(
        &self,
        account_name: &str,
        file_system_name: &str,
        credentials: &Credentials,
    ) -> Result<Self::Gen2>;
}
