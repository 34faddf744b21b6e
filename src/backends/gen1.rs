//! Generation-1 backend implementation
//!
//! Wraps a hierarchical-namespace client. Every operation is a direct
//! delegation except `walk`, which recurses depth-first because the client
//! only lists one directory at a time.

use crate::auth::Credentials;
use crate::client::{Gen1Client, Gen1Connector, Gen1Entry};
use crate::error::{FsError, Result};
use crate::filesystem::walker::walk_depth_first;
use crate::traits::{DirEntry, EntryStream, FileHandle, FileInfo, FileSystem, FileType, OpenMode};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Decode a millisecond Unix timestamp, keeping absence distinct from zero
pub(crate) fn time_from_millis(millis: Option<i64>) -> Result<Option<DateTime<Utc>>> {
    millis
        .map(|ms| {
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| FsError::Decode(format!("Timestamp out of range: {ms}")))
        })
        .transpose()
}

/// Normalize a status dictionary into [`FileInfo`]
///
/// The store never reports creation times, so `create_time` is always `None`.
pub(crate) fn prepare_info(entry: &Gen1Entry) -> Result<FileInfo> {
    let file_type: FileType = entry.kind.parse()?;
    Ok(FileInfo::new(file_type, entry.length.unwrap_or(0))
        .with_access_time(time_from_millis(entry.access_time)?)
        .with_modify_time(time_from_millis(entry.modification_time)?))
}

/// File system over a Generation-1 store
pub struct Gen1FileSystem<C: Gen1Client> {
    client: C,
    store_name: String,
}

impl<C: Gen1Client> Gen1FileSystem<C> {
    /// Wrap an already authenticated client
    pub fn new(client: C, store_name: impl Into<String>) -> Self {
        Self {
            client,
            store_name: store_name.into(),
        }
    }

    /// Authenticate through `connector` and build the backend
    ///
    /// # Errors
    ///
    /// Propagates the connector's authentication or transport error.
    pub async fn connect<K>(connector: &K, store_name: &str, credentials: &Credentials) -> Result<Self>
    where
        K: Gen1Connector<Gen1 = C>,
    {
        info!(
            "Attempting to use {} authentication for datalake store {}",
            credentials.flow(),
            store_name
        );
        let client = connector.connect_gen1(store_name, credentials).await?;
        Ok(Self::new(client, store_name))
    }

    #[must_use]
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    #[must_use]
    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait]
impl<C: Gen1Client> FileSystem for Gen1FileSystem<C> {
    fn name(&self) -> &str {
        &self.store_name
    }

    async fn open(&self, path: &str, mode: &str) -> Result<FileHandle> {
        let mode: OpenMode = mode.parse()?;
        debug!("Opening {} on {} ({:?})", path, self.store_name, mode);
        // The store only serves bytes; text mode decodes on top
        let bytes = self.client.open(path).await?;
        FileHandle::from_bytes(bytes, mode)
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        match self.client.exists(path).await {
            Err(e) if e.is_not_found() => Ok(false),
            other => other,
        }
    }

    async fn info(&self, path: &str) -> Result<FileInfo> {
        let entry = self.client.info(path).await?;
        prepare_info(&entry)
    }

    fn ls<'a>(&'a self, path: &'a str, with_info: bool) -> EntryStream<'a> {
        if with_info {
            stream::once(async move {
                debug!("Listing {} with detail", path);
                self.client.ls_detail(path).await
            })
            .map_ok(|entries| {
                stream::iter(entries.into_iter().map(|entry| {
                    prepare_info(&entry).map(|info| DirEntry::new(entry.name, Some(info)))
                }))
            })
            .try_flatten()
            .boxed()
        } else {
            stream::once(async move {
                debug!("Listing {}", path);
                self.client.ls(path).await
            })
            .map_ok(|names| {
                stream::iter(
                    names
                        .into_iter()
                        .map(|name| Ok::<_, FsError>(DirEntry::new(name, None))),
                )
            })
            .try_flatten()
            .boxed()
        }
    }

    fn walk<'a>(&'a self, base_path: &'a str, with_info: bool) -> EntryStream<'a> {
        walk_depth_first(&self.client, base_path, with_info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prepare_info_maps_millisecond_times() {
        let entry = Gen1Entry::from_value(json!({
            "name": "/raw/data.csv",
            "type": "FILE",
            "length": 12430,
            "accessTime": 1_600_300_800_000_i64,
            "modificationTime": 1_600_214_400_000_i64
        }))
        .unwrap();

        let info = prepare_info(&entry).unwrap();
        assert_eq!(info.file_type, FileType::File);
        assert_eq!(info.size, 12430);
        assert_eq!(
            info.access_time.map(|t| t.to_rfc3339()),
            Some("2020-09-17T00:00:00+00:00".to_string())
        );
        assert_eq!(
            info.modify_time.map(|t| t.to_rfc3339()),
            Some("2020-09-16T00:00:00+00:00".to_string())
        );
        assert_eq!(info.create_time, None);
    }

    #[test]
    fn test_prepare_info_absent_keys_stay_absent() {
        let entry = Gen1Entry::from_value(json!({"name": "/raw", "type": "DIRECTORY"})).unwrap();
        let info = prepare_info(&entry).unwrap();
        assert_eq!(info, FileInfo::new(FileType::Directory, 0));
    }

    #[test]
    fn test_prepare_info_epoch_is_not_absent() {
        let entry = Gen1Entry::from_value(json!({
            "name": "/raw", "type": "DIRECTORY", "modificationTime": 0
        }))
        .unwrap();
        let info = prepare_info(&entry).unwrap();
        assert_eq!(info.modify_time, DateTime::from_timestamp_millis(0));
    }

    #[test]
    fn test_prepare_info_rejects_unknown_type() {
        let entry = Gen1Entry::from_value(json!({"name": "/raw/link", "type": "SYMLINK"})).unwrap();
        assert!(matches!(prepare_info(&entry), Err(FsError::Decode(_))));
    }

    #[test]
    fn test_out_of_range_timestamp() {
        assert!(matches!(
            time_from_millis(Some(i64::MAX)),
            Err(FsError::Decode(_))
        ));
        assert_eq!(time_from_millis(None).unwrap(), None);
    }
}
