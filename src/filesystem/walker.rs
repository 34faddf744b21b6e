//! Lazy depth-first tree walking over a hierarchical store
//!
//! The Generation-1 client can only list one directory per request. This
//! module turns that into a single stream covering a whole subtree without
//! materializing it: each directory is listed only when the walk reaches it.
//!
//! # Order
//!
//! Pre-order, level-first within a directory: all entries of a directory are
//! yielded in listing order, then each of its subdirectories is walked in
//! that same order, fully, before its next sibling.

use crate::backends::gen1::prepare_info;
use crate::client::{Gen1Client, Gen1Entry};
use crate::error::{FsError, Result};
use crate::traits::{DirEntry, EntryStream, FileType};
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use tracing::debug;

/// Walk state kept between polls
///
/// `pending` is an explicit stack of sibling queues standing in for the
/// call stack of a recursive walk.
struct DepthFirstWalker<'a, C> {
    client: &'a C,
    with_info: bool,
    /// Directory to list before yielding anything else
    next_listing: Option<String>,
    /// Entries of the directory currently being yielded
    current: VecDeque<Gen1Entry>,
    /// Subdirectories discovered in `current`, in listing order
    level_dirs: VecDeque<String>,
    /// Sibling directories still to walk, innermost level last
    pending: Vec<VecDeque<String>>,
}

impl<'a, C: Gen1Client> DepthFirstWalker<'a, C> {
    fn new(client: &'a C, base_path: &str, with_info: bool) -> Self {
        Self {
            client,
            with_info,
            next_listing: Some(base_path.to_string()),
            current: VecDeque::new(),
            level_dirs: VecDeque::new(),
            pending: Vec::new(),
        }
    }

    /// Produce the next entry, listing directories as they are reached
    ///
    /// # Errors
    ///
    /// Returns the listing error, or `Decode` for an unrecognized entry type.
    async fn next_entry(&mut self) -> Result<Option<DirEntry>> {
        loop {
            if let Some(dir) = self.next_listing.take() {
                debug!("Walking into {}", dir);
                self.current = self.client.ls_detail(&dir).await?.into();
                continue;
            }

            if let Some(entry) = self.current.pop_front() {
                // Classify even without info: recursion depends on it
                let file_type: FileType = entry.kind.parse()?;
                let info = if self.with_info {
                    Some(prepare_info(&entry)?)
                } else {
                    None
                };
                if file_type == FileType::Directory {
                    self.level_dirs.push_back(entry.name.clone());
                }
                return Ok(Some(DirEntry::new(entry.name, info)));
            }

            if !self.level_dirs.is_empty() {
                self.pending.push(std::mem::take(&mut self.level_dirs));
            }

            let Some(siblings) = self.pending.last_mut() else {
                return Ok(None);
            };
            match siblings.pop_front() {
                Some(dir) => self.next_listing = Some(dir),
                None => {
                    self.pending.pop();
                }
            }
        }
    }
}

/// Stream every descendant of `base_path`, depth-first
///
/// Each directory costs one detailed listing request, issued when the
/// stream reaches it. The first error ends the stream.
pub fn walk_depth_first<'a, C: Gen1Client>(
    client: &'a C,
    base_path: &str,
    with_info: bool,
) -> EntryStream<'a> {
    let walker = DepthFirstWalker::new(client, base_path, with_info);
    stream::try_unfold(walker, |mut walker| async move {
        let next = walker.next_entry().await?;
        Ok::<_, FsError>(next.map(|entry| (entry, walker)))
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientCall, MemoryStore};
    use futures::TryStreamExt;

    fn paths(entries: &[DirEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[compio::test]
    async fn test_walk_empty_directory() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.add_dir("/empty")?;

        let entries: Vec<DirEntry> = walk_depth_first(&store, "/empty", true).try_collect().await?;
        assert!(entries.is_empty());
        Ok(())
    }

    #[compio::test]
    async fn test_walk_pre_order() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.add_file("/root/a/x/deep.txt", "1")?;
        store.add_file("/root/a/y.txt", "2")?;
        store.add_file("/root/b/z.txt", "3")?;
        store.add_file("/root/c.txt", "4")?;

        let entries: Vec<DirEntry> = walk_depth_first(&store, "/root", false).try_collect().await?;
        assert_eq!(
            paths(&entries),
            vec![
                "/root/a",
                "/root/b",
                "/root/c.txt",
                "/root/a/x",
                "/root/a/y.txt",
                "/root/a/x/deep.txt",
                "/root/b/z.txt",
            ]
        );
        assert!(entries.iter().all(|e| e.info.is_none()));
        Ok(())
    }

    #[compio::test]
    async fn test_walk_lists_lazily() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store.add_file("/root/a/one.txt", "1")?;
        store.add_file("/root/b/two.txt", "2")?;

        let mut walk = walk_depth_first(&store, "/root", true);
        assert!(store.calls().is_empty());

        let first = walk.try_next().await?;
        assert_eq!(first.map(|e| e.path), Some("/root/a".to_string()));
        assert_eq!(store.calls(), vec![ClientCall::Gen1LsDetail("/root".into())]);

        let rest: Vec<DirEntry> = walk.try_collect().await?;
        assert_eq!(rest.len(), 3);
        assert_eq!(
            store.calls(),
            vec![
                ClientCall::Gen1LsDetail("/root".into()),
                ClientCall::Gen1LsDetail("/root/a".into()),
                ClientCall::Gen1LsDetail("/root/b".into()),
            ]
        );
        Ok(())
    }

    #[compio::test]
    async fn test_walk_missing_base_errors() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let result: Result<Vec<DirEntry>> = walk_depth_first(&store, "/nope", true).try_collect().await;
        assert!(matches!(result, Err(FsError::NotFound(_))));
        Ok(())
    }
}
