//! In-memory store implementing both client generations
//!
//! Paths are absolute and `/`-separated; parents are created implicitly and
//! children are listed in lexicographic order. Every client request is
//! appended to a call log so tests can assert exactly which requests a
//! backend issued.

use super::gen1::{Gen1Client, Gen1Connector, Gen1Entry};
use super::gen2::{
    ContentSettings, FileProperties, Gen2Client, Gen2Connector, Gen2FileClient, PathProperties,
};
use crate::auth::Credentials;
use crate::error::{FsError, Result};
use crate::traits::FileType;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Content type given to files unless overridden
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A request received by the in-memory clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCall {
    Gen1Exists(String),
    Gen1Info(String),
    Gen1Ls(String),
    Gen1LsDetail(String),
    Gen1Open(String),
    GetFileClient(String),
    GetFileProperties(String),
    DownloadFile { path: String, max_concurrency: usize },
    GetPaths { path: String, recursive: bool },
}

/// Collaborator failure to simulate on a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Authentication,
    Transport,
}

impl Failure {
    fn to_error(self, path: &str) -> FsError {
        match self {
            Self::Authentication => FsError::Authentication(format!("token expired for {path}")),
            Self::Transport => FsError::Transport(format!("connection reset while reading {path}")),
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    /// `None` for directories
    data: Option<Vec<u8>>,
    content_type: Option<String>,
    metadata: HashMap<String, String>,
    accessed: Option<DateTime<Utc>>,
    modified: Option<DateTime<Utc>>,
    created: Option<DateTime<Utc>>,
}

impl MemoryNode {
    fn directory() -> Self {
        Self {
            data: None,
            content_type: None,
            metadata: HashMap::new(),
            accessed: None,
            modified: None,
            created: None,
        }
    }

    fn file(data: Vec<u8>) -> Self {
        Self {
            data: Some(data),
            content_type: Some(DEFAULT_CONTENT_TYPE.to_string()),
            ..Self::directory()
        }
    }

    fn file_type(&self) -> FileType {
        if self.data.is_some() {
            FileType::File
        } else {
            FileType::Directory
        }
    }

    fn size(&self) -> u64 {
        self.data.as_ref().map_or(0, |data| data.len() as u64)
    }

    fn to_gen1_entry(&self, path: &str) -> Gen1Entry {
        Gen1Entry {
            name: path.to_string(),
            kind: self.file_type().as_str().to_string(),
            length: Some(self.size()),
            access_time: self.accessed.map(|t| t.timestamp_millis()),
            modification_time: self.modified.map(|t| t.timestamp_millis()),
        }
    }

    fn to_path_properties(&self, path: &str) -> PathProperties {
        PathProperties::new(path, self.data.is_none(), self.size())
    }
}

#[derive(Debug)]
struct Inner {
    nodes: RwLock<BTreeMap<String, MemoryNode>>,
    failures: RwLock<HashMap<String, Failure>>,
    calls: Mutex<Vec<ClientCall>>,
}

/// Shared in-memory tree; clones share state
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Normalize to an absolute path without trailing or duplicate separators
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();
    format!("/{}", parts.join("/"))
}

fn child_prefix(path: &str) -> String {
    if path == "/" {
        "/".to_string()
    } else {
        format!("{path}/")
    }
}

impl MemoryStore {
    /// Create a store holding only the root directory
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert("/".to_string(), MemoryNode::directory());
        Self {
            inner: Arc::new(Inner {
                nodes: RwLock::new(nodes),
                failures: RwLock::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a directory and any missing parents
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidArgument`] if a file is in the way.
    pub fn add_dir(&self, path: &str) -> Result<()> {
        let path = normalize_path(path);
        let mut nodes = write(&self.inner.nodes);
        Self::ensure_dirs(&mut nodes, &path)
    }

    /// Create or replace a file, creating missing parent directories
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidArgument`] if a parent is a file or the
    /// path is an existing directory.
    pub fn add_file(&self, path: &str, data: impl Into<Vec<u8>>) -> Result<()> {
        let path = normalize_path(path);
        let mut nodes = write(&self.inner.nodes);
        if let Some((parent, _)) = path.rsplit_once('/') {
            Self::ensure_dirs(&mut nodes, &normalize_path(parent))?;
        }
        if nodes.get(&path).is_some_and(|node| node.data.is_none()) {
            return Err(FsError::InvalidArgument(format!("{path} is a directory")));
        }
        nodes.insert(path, MemoryNode::file(data.into()));
        Ok(())
    }

    fn ensure_dirs(nodes: &mut BTreeMap<String, MemoryNode>, path: &str) -> Result<()> {
        let mut current = String::new();
        for part in path.split('/').filter(|part| !part.is_empty()) {
            current.push('/');
            current.push_str(part);
            match nodes.get(&current) {
                Some(node) if node.data.is_some() => {
                    return Err(FsError::InvalidArgument(format!("{current} is a file")));
                }
                Some(_) => {}
                None => {
                    nodes.insert(current.clone(), MemoryNode::directory());
                }
            }
        }
        Ok(())
    }

    fn update(&self, path: &str, apply: impl FnOnce(&mut MemoryNode)) -> Result<()> {
        let path = normalize_path(path);
        let mut nodes = write(&self.inner.nodes);
        let node = nodes
            .get_mut(&path)
            .ok_or_else(|| FsError::NotFound(path.clone()))?;
        apply(node);
        Ok(())
    }

    /// Override the content type reported by Generation-2 property fetches
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if the path does not exist.
    pub fn set_content_type(&self, path: &str, content_type: Option<&str>) -> Result<()> {
        self.update(path, |node| {
            node.content_type = content_type.map(str::to_string);
        })
    }

    /// Attach a metadata pair reported by Generation-2 property fetches
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if the path does not exist.
    pub fn set_metadata(&self, path: &str, key: &str, value: &str) -> Result<()> {
        self.update(path, |node| {
            node.metadata.insert(key.to_string(), value.to_string());
        })
    }

    /// Set the access, modification and creation timestamps
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if the path does not exist.
    pub fn set_times(
        &self,
        path: &str,
        accessed: Option<DateTime<Utc>>,
        modified: Option<DateTime<Utc>>,
        created: Option<DateTime<Utc>>,
    ) -> Result<()> {
        self.update(path, |node| {
            node.accessed = accessed;
            node.modified = modified;
            node.created = created;
        })
    }

    /// Make every request touching `path` fail with `failure`
    pub fn inject_failure(&self, path: &str, failure: Failure) {
        write(&self.inner.failures).insert(normalize_path(path), failure);
    }

    /// Requests received so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<ClientCall> {
        lock(&self.inner.calls).clone()
    }

    pub fn clear_calls(&self) {
        lock(&self.inner.calls).clear();
    }

    fn record(&self, call: ClientCall) {
        lock(&self.inner.calls).push(call);
    }

    fn check_failure(&self, path: &str) -> Result<()> {
        match read(&self.inner.failures).get(path) {
            Some(failure) => Err(failure.to_error(path)),
            None => Ok(()),
        }
    }

    fn node(&self, path: &str) -> Result<MemoryNode> {
        self.check_failure(path)?;
        read(&self.inner.nodes)
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    /// Children of a directory, or all descendants when `recursive`
    fn children(&self, path: &str, recursive: bool) -> Vec<(String, MemoryNode)> {
        let prefix = child_prefix(path);
        read(&self.inner.nodes)
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .filter(|(key, _)| recursive || !key[prefix.len()..].contains('/'))
            .map(|(key, node)| (key.clone(), node.clone()))
            .collect()
    }

    /// Listing semantics of the hierarchical store: a file lists as itself
    fn gen1_listing(&self, path: &str) -> Result<Vec<(String, MemoryNode)>> {
        let node = self.node(path)?;
        if node.data.is_some() {
            return Ok(vec![(path.to_string(), node)]);
        }
        Ok(self.children(path, false))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Gen1Client for MemoryStore {
    async fn exists(&self, path: &str) -> Result<bool> {
        let path = normalize_path(path);
        self.record(ClientCall::Gen1Exists(path.clone()));
        match self.node(&path) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn info(&self, path: &str) -> Result<Gen1Entry> {
        let path = normalize_path(path);
        self.record(ClientCall::Gen1Info(path.clone()));
        Ok(self.node(&path)?.to_gen1_entry(&path))
    }

    async fn ls(&self, path: &str) -> Result<Vec<String>> {
        let path = normalize_path(path);
        self.record(ClientCall::Gen1Ls(path.clone()));
        Ok(self
            .gen1_listing(&path)?
            .into_iter()
            .map(|(name, _)| name)
            .collect())
    }

    async fn ls_detail(&self, path: &str) -> Result<Vec<Gen1Entry>> {
        let path = normalize_path(path);
        self.record(ClientCall::Gen1LsDetail(path.clone()));
        Ok(self
            .gen1_listing(&path)?
            .iter()
            .map(|(name, node)| node.to_gen1_entry(name))
            .collect())
    }

    async fn open(&self, path: &str) -> Result<Vec<u8>> {
        let path = normalize_path(path);
        self.record(ClientCall::Gen1Open(path.clone()));
        self.node(&path)?
            .data
            .ok_or_else(|| FsError::InvalidArgument(format!("{path} is a directory")))
    }
}

/// Per-path Generation-2 client over a [`MemoryStore`]
#[derive(Debug, Clone)]
pub struct MemoryFileClient {
    store: MemoryStore,
    path: String,
}

#[async_trait]
impl Gen2FileClient for MemoryFileClient {
    async fn get_file_properties(&self) -> Result<FileProperties> {
        self.store
            .record(ClientCall::GetFileProperties(self.path.clone()));
        let node = self.store.node(&self.path)?;
        Ok(FileProperties {
            size: node.size(),
            content_settings: ContentSettings {
                content_type: node.content_type,
            },
            last_modified: node.modified,
            creation_time: node.created,
            metadata: node.metadata,
        })
    }

    async fn download_file(&self, max_concurrency: usize) -> Result<Vec<u8>> {
        self.store.record(ClientCall::DownloadFile {
            path: self.path.clone(),
            max_concurrency,
        });
        if max_concurrency == 0 {
            return Err(FsError::InvalidArgument(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        let data = self
            .store
            .node(&self.path)?
            .data
            .ok_or_else(|| FsError::InvalidArgument(format!("{} is a directory", self.path)))?;
        // Ranged downloads of empty blobs are rejected by the service
        if data.is_empty() {
            return Err(FsError::Transport(format!(
                "range not satisfiable for empty object {}",
                self.path
            )));
        }
        Ok(data)
    }
}

#[async_trait]
impl Gen2Client for MemoryStore {
    type File = MemoryFileClient;

    fn get_file_client(&self, path: &str) -> Self::File {
        let path = normalize_path(path);
        self.record(ClientCall::GetFileClient(path.clone()));
        MemoryFileClient {
            store: self.clone(),
            path,
        }
    }

    async fn get_paths(&self, path: &str, recursive: bool) -> Result<Vec<PathProperties>> {
        let path = normalize_path(path);
        self.record(ClientCall::GetPaths {
            path: path.clone(),
            recursive,
        });
        if self.node(&path)?.data.is_some() {
            return Err(FsError::InvalidArgument(format!("{path} is not a directory")));
        }
        Ok(self
            .children(&path, recursive)
            .iter()
            .map(|(name, node)| node.to_path_properties(name))
            .collect())
    }
}

/// Connector handing out clients bound to one [`MemoryStore`]
///
/// Records every connection request so tests can check which credentials
/// a factory resolved.
#[derive(Debug, Clone)]
pub struct MemoryConnector {
    store: MemoryStore,
    reject: bool,
    connections: Arc<Mutex<Vec<(String, Credentials)>>>,
}

impl MemoryConnector {
    #[must_use]
    pub fn new(store: MemoryStore) -> Self {
        Self {
            store,
            reject: false,
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Connector whose authentication always fails
    #[must_use]
    pub fn rejecting(store: MemoryStore) -> Self {
        Self {
            reject: true,
            ..Self::new(store)
        }
    }

    /// `(target, credentials)` pairs seen so far
    #[must_use]
    pub fn connections(&self) -> Vec<(String, Credentials)> {
        lock(&self.connections).clone()
    }

    fn authenticate(&self, target: String, credentials: &Credentials) -> Result<MemoryStore> {
        lock(&self.connections).push((target.clone(), credentials.clone()));
        if self.reject {
            return Err(FsError::Authentication(format!(
                "{} authentication rejected for {target}",
                credentials.flow()
            )));
        }
        Ok(self.store.clone())
    }
}

#[async_trait]
impl Gen1Connector for MemoryConnector {
    type Gen1 = MemoryStore;

    async fn connect_gen1(&self, store_name: &str, credentials: &Credentials) -> Result<MemoryStore> {
        self.authenticate(store_name.to_string(), credentials)
    }
}

#[async_trait]
impl Gen2Connector for MemoryConnector {
    type Gen2 = MemoryStore;

    async fn connect_gen2(
        &self,
        account_name: &str,
        file_system_name: &str,
        credentials: &Credentials,
    ) -> Result<MemoryStore> {
        self.authenticate(format!("{account_name}/{file_system_name}"), credentials)
    }
}
