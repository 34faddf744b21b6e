//! Command-line style configuration
//!
//! This module organizes options by **functional usage** - each group
//! contains the options needed by a specific component. Applications embed
//! the groups with `#[command(flatten)]` or parse [`Args`] directly.

use crate::adaptive_concurrency::{
    DownloadConcurrency, DEFAULT_MAX_THREADS_COUNT, DEFAULT_THREAD_CHUNK_SIZE,
};
use crate::auth::{AdlSecret, Credentials};
use crate::error::{FsError, Result};
use clap::Parser;

/// Uniform access to data lake stores
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Store selection and authentication
    #[command(flatten)]
    pub store: StoreConfig,

    /// Output and logging configuration
    #[command(flatten)]
    pub output: OutputConfig,
}

impl Args {
    /// Validate all option groups
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] for the first invalid group.
    pub fn validate(&self) -> Result<()> {
        self.store.validate()?;
        self.output.validate()
    }
}

// ============================================================================
// FUNCTIONAL GROUPS: Organized by what component consumes them
// ============================================================================

/// Store generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Generation {
    /// Hierarchical-namespace store addressed by store name
    Gen1,
    /// Flat-namespace store addressed by account and file system
    Gen2,
}

/// Store selection and authentication
///
/// Used by: `backends::connect()`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Store Options")]
pub struct StoreConfig {
    /// Store generation to connect to
    #[arg(long, value_enum, default_value = "gen2")]
    pub generation: Generation,

    /// Generation-1 store name
    #[arg(long)]
    pub store_name: Option<String>,

    /// Generation-2 storage account name
    #[arg(long)]
    pub account_name: Option<String>,

    /// Generation-2 file system (container) name
    #[arg(long = "file-system")]
    pub file_system_name: Option<String>,

    /// Use interactive browser authentication
    #[arg(long)]
    pub interactive: bool,

    /// Service principal as `tenant_id:client_id:client_secret`
    #[arg(long, value_name = "SECRET")]
    pub adl_secret: Option<AdlSecret>,

    /// Download sizing (Generation-2 only)
    #[command(flatten)]
    pub download: DownloadConfig,
}

impl StoreConfig {
    /// Validate store options
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if:
    /// - The name(s) required by the selected generation are missing or empty
    /// - Neither `--interactive` nor `--adl-secret` is given
    /// - The download limits are invalid
    pub fn validate(&self) -> Result<()> {
        match self.generation {
            Generation::Gen1 => {
                self.required_store_name()?;
            }
            Generation::Gen2 => {
                self.required_account()?;
            }
        }
        self.credentials()?;
        self.download.to_concurrency()?;
        Ok(())
    }

    /// Resolve the authentication flow
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if no flow is configured.
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::from_config(self.interactive, self.adl_secret.clone())
    }

    /// Generation-1 store name
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if it is missing or empty.
    pub fn required_store_name(&self) -> Result<&str> {
        non_empty(self.store_name.as_deref(), "--store-name is required for gen1")
    }

    /// Generation-2 account and file system names
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if either is missing or empty.
    pub fn required_account(&self) -> Result<(&str, &str)> {
        Ok((
            non_empty(self.account_name.as_deref(), "--account-name is required for gen2")?,
            non_empty(self.file_system_name.as_deref(), "--file-system is required for gen2")?,
        ))
    }
}

fn non_empty<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| FsError::Config(message.to_string()))
}

/// Chunked download configuration
///
/// Used by: `Gen2FileSystem::open()` via `DownloadConcurrency`
#[derive(clap::Args, Debug, Clone)]
#[command(next_help_heading = "Download Options")]
pub struct DownloadConfig {
    /// Bytes per download worker (0 = always use --max-threads-count workers)
    #[arg(long, default_value_t = DEFAULT_THREAD_CHUNK_SIZE)]
    pub thread_chunk_size: u64,

    /// Maximum parallel workers per download
    #[arg(long, default_value_t = DEFAULT_MAX_THREADS_COUNT)]
    pub max_threads_count: usize,
}

impl DownloadConfig {
    /// Convert to the options struct used by the Generation-2 backend
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if `max_threads_count` is 0.
    pub fn to_concurrency(&self) -> Result<DownloadConcurrency> {
        DownloadConcurrency::new(self.thread_chunk_size, self.max_threads_count)
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            thread_chunk_size: DEFAULT_THREAD_CHUNK_SIZE,
            max_threads_count: DEFAULT_MAX_THREADS_COUNT,
        }
    }
}

/// Output and logging configuration
///
/// Used by: `logging::init_tracing()`
#[derive(clap::Args, Debug, Clone, Default)]
#[command(next_help_heading = "Output Options")]
pub struct OutputConfig {
    /// Verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress all output except errors)
    #[arg(short, long)]
    pub quiet: bool,
}

impl OutputConfig {
    /// Validate output options
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if both `--quiet` and `--verbose` are set.
    pub fn validate(&self) -> Result<()> {
        if self.quiet && self.verbose > 0 {
            return Err(FsError::Config(
                "Cannot use both --quiet and --verbose options".to_string(),
            ));
        }
        Ok(())
    }
}
