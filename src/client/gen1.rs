//! Generation-1 (hierarchical namespace) client seam
//!
//! The legacy store exposes true directories and returns WebHDFS-style
//! status dictionaries. Only the calls the backend needs are modelled here.

use crate::auth::Credentials;
use crate::error::{FsError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Status dictionary for one path, as returned by `info` and detailed `ls`
///
/// Deserializes from the store's JSON; keys the core does not use are
/// ignored. `kind` is kept as the raw tag so that unknown values surface as
/// decode errors in the backend rather than at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gen1Entry {
    /// Full path of the entry
    pub name: String,
    /// Raw type tag (`FILE` / `DIRECTORY`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Byte length, absent for some directory entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    /// Access time in milliseconds since the Unix epoch
    #[serde(rename = "accessTime", default, skip_serializing_if = "Option::is_none")]
    pub access_time: Option<i64>,
    /// Modification time in milliseconds since the Unix epoch
    #[serde(
        rename = "modificationTime",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub modification_time: Option<i64>,
}

impl Gen1Entry {
    /// Parse a status dictionary received from the store
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Decode`] if required keys are missing or mistyped.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| FsError::Decode(format!("Malformed status dictionary: {e}")))
    }
}

/// Legacy hierarchical-namespace client
///
/// Implementations report a missing path with [`FsError::NotFound`] and
/// pass authentication/transport failures through unchanged.
#[async_trait]
pub trait Gen1Client: Send + Sync {
    /// Whether the path exists
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Status dictionary for the path
    async fn info(&self, path: &str) -> Result<Gen1Entry>;

    /// Names of the immediate children (no per-entry detail)
    async fn ls(&self, path: &str) -> Result<Vec<String>>;

    /// Status dictionaries of the immediate children
    async fn ls_detail(&self, path: &str) -> Result<Vec<Gen1Entry>>;

    /// Read the whole object as bytes
    async fn open(&self, path: &str) -> Result<Vec<u8>>;
}

/// Authenticates and builds a [`Gen1Client`] for a store
#[async_trait]
pub trait Gen1Connector: Send + Sync {
    /// Client produced by this connector
    type Gen1: Gen1Client + 'static;

    /// Acquire a token for `credentials` and bind a client to `store_name`
    async fn connect_gen1(&self, store_name: &str, credentials: &Credentials)
        -> Result<Self::Gen1>;
}
