//! File system backend implementations
//!
//! This module provides concrete implementations of the [`FileSystem`]
//! trait for both store generations, and a factory that picks one from
//! configuration so callers only ever hold the trait object.

pub mod gen1;
pub mod gen2;

// Re-export main types for convenience
pub use gen1::Gen1FileSystem;
pub use gen2::Gen2FileSystem;

use crate::cli::{Generation, StoreConfig};
use crate::client::{Gen1Connector, Gen2Connector};
use crate::error::Result;
use crate::traits::FileSystem;
use tracing::info;

/// A connector able to build clients for either generation
pub trait Connector: Gen1Connector + Gen2Connector {}

impl<K: Gen1Connector + Gen2Connector> Connector for K {}

/// Build the backend selected by `config`
///
/// Configuration is validated and credentials resolved before the connector
/// is called, so configuration mistakes never reach the network.
///
/// # Errors
///
/// Returns `Err(FsError)` if:
/// - The configuration is invalid (`Config`)
/// - The connector fails to authenticate or reach the store
pub async fn connect<K: Connector>(config: &StoreConfig, connector: &K) -> Result<Box<dyn FileSystem>> {
    config.validate()?;
    let credentials = config.credentials()?;

    match config.generation {
        Generation::Gen1 => {
            let store_name = config.required_store_name()?;
            let fs = Gen1FileSystem::connect(connector, store_name, &credentials).await?;
            info!("Connected to Generation-1 store {}", fs.store_name());
            Ok(Box::new(fs))
        }
        Generation::Gen2 => {
            let (account_name, file_system_name) = config.required_account()?;
            let fs = Gen2FileSystem::connect(connector, account_name, file_system_name, &credentials)
                .await?
                .with_concurrency(config.download.to_concurrency()?);
            info!(
                "Connected to Generation-2 account {} ({})",
                fs.account_name(),
                fs.file_system_name()
            );
            Ok(Box::new(fs))
        }
    }
}
