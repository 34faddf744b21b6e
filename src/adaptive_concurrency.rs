//! Adaptive download concurrency sizing
//!
//! Chunked downloads on the Generation-2 store are executed by the client,
//! which needs to be told how many parallel workers to use. This module
//! derives that count from the object's size and two configured limits.
//!
//! # Architecture
//!
//! Each module owns its configuration:
//! - `DownloadConcurrency` - validated limits (owned by this module)
//! - `max_concurrency` - the sizing rule itself, usable without the options

use crate::error::{FsError, Result};
use std::num::NonZeroUsize;

/// Default bytes handled by one download worker (10 MiB)
pub const DEFAULT_THREAD_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Default ceiling on download workers
pub const DEFAULT_MAX_THREADS_COUNT: usize = 10;

// ============================================================================
// SIZING RULE
// ============================================================================

/// Number of concurrent workers to request for a download
///
/// - `thread_chunk_size == 0` disables chunking: the ceiling is used as is.
/// - Otherwise one worker per started chunk, i.e.
///   `min(max_threads_count, max(1, ceil(file_size / thread_chunk_size)))`.
///
/// # Examples
///
/// ```
/// use dlfs::adaptive_concurrency::max_concurrency;
///
/// assert_eq!(max_concurrency(15_000, 10_000, 3), 2);
/// assert_eq!(max_concurrency(50_000, 0, 30), 30);
/// ```
#[must_use]
pub fn max_concurrency(file_size: u64, thread_chunk_size: u64, max_threads_count: usize) -> usize {
    if thread_chunk_size == 0 {
        return max_threads_count;
    }
    let chunks = file_size.div_ceil(thread_chunk_size);
    let chunks = usize::try_from(chunks).unwrap_or(usize::MAX);
    std::cmp::min(max_threads_count, std::cmp::max(1, chunks))
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Download concurrency limits
///
/// Uses `NonZeroUsize` to guarantee at compile-time that the worker ceiling
/// is at least 1, so sizing never asks the client for zero workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadConcurrency {
    /// Bytes per worker chunk (0 = no chunking limit)
    thread_chunk_size: u64,
    /// Hard ceiling on workers (guaranteed >= 1)
    max_threads_count: NonZeroUsize,
}

impl DownloadConcurrency {
    /// Create validated download limits
    ///
    /// # Arguments
    ///
    /// * `thread_chunk_size` - Bytes per worker chunk, 0 to always use the ceiling
    /// * `max_threads_count` - Maximum workers per download
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Config`] if `max_threads_count` is 0.
    pub fn new(thread_chunk_size: u64, max_threads_count: usize) -> Result<Self> {
        let max_threads_count = NonZeroUsize::new(max_threads_count).ok_or_else(|| {
            FsError::Config("max_threads_count must be at least 1".to_string())
        })?;
        Ok(Self {
            thread_chunk_size,
            max_threads_count,
        })
    }

    #[must_use]
    pub const fn thread_chunk_size(&self) -> u64 {
        self.thread_chunk_size
    }

    #[must_use]
    pub const fn max_threads_count(&self) -> usize {
        self.max_threads_count.get()
    }

    /// Workers to request for an object of `file_size` bytes (always >= 1)
    #[must_use]
    pub fn workers_for(&self, file_size: u64) -> usize {
        max_concurrency(file_size, self.thread_chunk_size, self.max_threads_count())
    }
}

impl Default for DownloadConcurrency {
    fn default() -> Self {
        Self {
            thread_chunk_size: DEFAULT_THREAD_CHUNK_SIZE,
            // DEFAULT_MAX_THREADS_COUNT is non-zero
            max_threads_count: NonZeroUsize::new(DEFAULT_MAX_THREADS_COUNT)
                .unwrap_or(NonZeroUsize::MIN),
        }
    }
}
