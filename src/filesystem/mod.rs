//! Shared traversal operations
//!
//! This module provides traversal logic that backends build their `walk`
//! on when the underlying client cannot list recursively.

pub mod walker;

pub use walker::walk_depth_first;
