//! Generation-2 backend implementation
//!
//! Wraps a flat-namespace client. Directories are an overlay on object keys,
//! so file/directory classification is inferred from property metadata, and
//! downloads are sized with the adaptive concurrency rule before being
//! handed to the client's chunked download primitive.

use crate::adaptive_concurrency::DownloadConcurrency;
use crate::auth::Credentials;
use crate::client::gen2::FOLDER_METADATA_KEY;
use crate::client::{FileProperties, Gen2Client, Gen2Connector, Gen2FileClient, PathProperties};
use crate::error::{FsError, Result};
use crate::traits::{DirEntry, EntryStream, FileHandle, FileInfo, FileSystem, FileType, OpenMode};
use async_trait::async_trait;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

/// Decide file vs directory from a property fetch
///
/// 1. The folder marker in metadata wins.
/// 2. No content type and zero size is a directory.
/// 3. No content type with content is treated as a file, and flagged.
/// 4. Any content type is a file (possibly empty).
#[must_use]
pub fn classify(path: &str, properties: &FileProperties) -> FileType {
    let folder_marker = properties
        .metadata
        .get(FOLDER_METADATA_KEY)
        .is_some_and(|value| value.eq_ignore_ascii_case("true"));
    if folder_marker {
        return FileType::Directory;
    }

    match (&properties.content_settings.content_type, properties.size) {
        (None, 0) => FileType::Directory,
        (None, size) => {
            warn!(
                "{} has no content type but {} bytes of content; treating it as a file",
                path, size
            );
            FileType::File
        }
        (Some(content_type), 0) => {
            debug!("{} is an empty {} file", path, content_type);
            FileType::File
        }
        (Some(_), _) => FileType::File,
    }
}

fn listing_entry(properties: PathProperties, with_info: bool) -> DirEntry {
    let info = with_info.then(|| {
        let file_type = if properties.is_directory {
            FileType::Directory
        } else {
            FileType::File
        };
        FileInfo::new(file_type, properties.content_length)
    });
    DirEntry::new(properties.name, info)
}

/// File system over a Generation-2 account's file system
pub struct Gen2FileSystem<C: Gen2Client> {
    client: C,
    account_name: String,
    file_system_name: String,
    concurrency: DownloadConcurrency,
}

impl<C: Gen2Client> Gen2FileSystem<C> {
    /// Wrap an already authenticated client with default download limits
    pub fn new(
        client: C,
        account_name: impl Into<String>,
        file_system_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            account_name: account_name.into(),
            file_system_name: file_system_name.into(),
            concurrency: DownloadConcurrency::default(),
        }
    }

    /// Replace the download concurrency limits
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: DownloadConcurrency) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Authenticate through `connector` and build the backend
    ///
    /// # Errors
    ///
    /// Propagates the connector's authentication or transport error.
    pub async fn connect<K>(
        connector: &K,
        account_name: &str,
        file_system_name: &str,
        credentials: &Credentials,
    ) -> Result<Self>
    where
        K: Gen2Connector<Gen2 = C>,
    {
        info!(
            "Attempting to use {} authentication for datalake account {} ({})",
            credentials.flow(),
            account_name,
            file_system_name
        );
        let client = connector
            .connect_gen2(account_name, file_system_name, credentials)
            .await?;
        Ok(Self::new(client, account_name, file_system_name))
    }

    #[must_use]
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    #[must_use]
    pub fn file_system_name(&self) -> &str {
        &self.file_system_name
    }

    #[must_use]
    pub const fn concurrency(&self) -> &DownloadConcurrency {
        &self.concurrency
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }

    fn list<'a>(&'a self, path: &'a str, recursive: bool, with_info: bool) -> EntryStream<'a> {
        stream::once(async move {
            debug!("Listing {} (recursive: {})", path, recursive);
            self.client.get_paths(path, recursive).await
        })
        .map_ok(move |paths| {
            stream::iter(
                paths
                    .into_iter()
                    .map(move |properties| Ok::<_, FsError>(listing_entry(properties, with_info))),
            )
        })
        .try_flatten()
        .boxed()
    }
}

#[async_trait]
impl<C: Gen2Client> FileSystem for Gen2FileSystem<C> {
    fn name(&self) -> &str {
        &self.account_name
    }

    async fn open(&self, path: &str, mode: &str) -> Result<FileHandle> {
        let mode: OpenMode = mode.parse()?;
        let info = self.info(path).await?;
        // Chunked downloads of empty objects fail in the client
        if info.size == 0 {
            debug!("{} is empty; skipping download", path);
            return Ok(FileHandle::empty(mode));
        }

        let max_concurrency = self.concurrency.workers_for(info.size);
        debug!(
            "Downloading {} ({} bytes) with {} workers",
            path, info.size, max_concurrency
        );
        let file = self.client.get_file_client(path);
        let bytes = file.download_file(max_concurrency).await?;
        FileHandle::from_bytes(bytes, mode)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match self.client.get_file_client(path).get_file_properties().await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn info(&self, path: &str) -> Result<FileInfo> {
        let properties = self.client.get_file_client(path).get_file_properties().await?;
        let file_type = classify(path, &properties);
        Ok(FileInfo::new(file_type, properties.size)
            .with_modify_time(properties.last_modified)
            .with_create_time(properties.creation_time))
    }

    fn ls<'a>(&'a self, path: &'a str, with_info: bool) -> EntryStream<'a> {
        self.list(path, false, with_info)
    }

    fn walk<'a>(&'a self, base_path: &'a str, with_info: bool) -> EntryStream<'a> {
        self.list(base_path, true, with_info)
    }
}
