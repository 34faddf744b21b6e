//! Generation-1 backend behaviour over the in-memory store

mod common;

use async_trait::async_trait;
use common::{paths, sample_store, utc};
use dlfs::backends::Gen1FileSystem;
use dlfs::client::{ClientCall, Failure, Gen1Client, Gen1Entry};
use dlfs::{DirEntry, FileInfo, FileSystem, FileType, FsError, OpenMode, Result};
use futures::{StreamExt, TryStreamExt};
use serde_json::json;
use std::io::{BufRead, Read};

/// Client reporting a status dictionary with an unknown type tag
struct SymlinkClient;

fn symlink_entry() -> Gen1Entry {
    Gen1Entry::from_value(json!({
        "name": "/links/current",
        "type": "SYMLINK",
        "length": 0,
        "accessTime": 1_600_300_800_000_i64,
        "modificationTime": 1_600_300_800_000_i64,
        "owner": "svc"
    }))
    .unwrap()
}

#[async_trait]
impl Gen1Client for SymlinkClient {
    async fn exists(&self, _path: &str) -> Result<bool> {
        Ok(true)
    }

    async fn info(&self, _path: &str) -> Result<Gen1Entry> {
        Ok(symlink_entry())
    }

    async fn ls(&self, _path: &str) -> Result<Vec<String>> {
        Ok(vec![symlink_entry().name])
    }

    async fn ls_detail(&self, _path: &str) -> Result<Vec<Gen1Entry>> {
        Ok(vec![symlink_entry()])
    }

    async fn open(&self, _path: &str) -> Result<Vec<u8>> {
        Ok(Vec::new())
    }
}

#[compio::test]
async fn test_open_text_decodes_utf8() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store.clone(), "dataplatformdls");

    let mut text = String::new();
    fs.open("/raw/notes.txt", "r").await?.read_to_string(&mut text)?;
    assert_eq!(text, "héllo wörld");
    assert_eq!(store.calls(), vec![ClientCall::Gen1Open("/raw/notes.txt".into())]);
    Ok(())
}

#[compio::test]
async fn test_open_binary_and_lines() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store, "dataplatformdls");

    let handle = fs.open("/raw/2020/summary.csv", "rb").await?;
    assert_eq!(handle.mode(), OpenMode::Binary);
    let lines: Vec<String> = handle.lines().collect::<std::io::Result<_>>()?;
    assert_eq!(lines, vec!["a,b", "1,2"]);
    Ok(())
}

#[compio::test]
async fn test_open_invalid_mode_makes_no_request() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store.clone(), "dataplatformdls");

    let result = fs.open("/raw/notes.txt", "w").await;
    assert!(matches!(result, Err(FsError::InvalidArgument(_))));
    assert!(store.calls().is_empty());
    Ok(())
}

#[compio::test]
async fn test_open_text_rejects_binary_content() -> anyhow::Result<()> {
    let store = sample_store()?;
    store.add_file("/raw/blob.bin", vec![0xff, 0xfe, 0x00])?;
    let fs = Gen1FileSystem::new(store, "dataplatformdls");

    assert!(matches!(
        fs.open("/raw/blob.bin", "r").await,
        Err(FsError::Decode(_))
    ));
    assert_eq!(fs.open("/raw/blob.bin", "rb").await?.len(), 3);
    Ok(())
}

#[compio::test]
async fn test_info_normalizes_status() -> anyhow::Result<()> {
    let store = sample_store()?;
    let accessed = utc(2020, 9, 17, 0, 0, 0);
    let modified = utc(2020, 9, 16, 12, 30, 0);
    store.set_times(
        "/raw/2020/01/events.json",
        Some(accessed),
        Some(modified),
        Some(utc(2019, 1, 1, 0, 0, 0)),
    )?;
    let fs = Gen1FileSystem::new(store, "dataplatformdls");

    let info = fs.info("/raw/2020/01/events.json").await?;
    assert_eq!(
        info,
        FileInfo::new(FileType::File, 12430)
            .with_access_time(Some(accessed))
            .with_modify_time(Some(modified))
    );
    // The store never reports creation times
    assert_eq!(info.create_time, None);

    let dir = fs.info("/raw/2020").await?;
    assert!(dir.is_dir());
    assert_eq!(dir.access_time, None);
    Ok(())
}

#[compio::test]
async fn test_exists_maps_not_found() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store.clone(), "dataplatformdls");

    assert!(fs.exists("/raw/notes.txt").await?);
    assert!(!fs.exists("/raw/nope.txt").await?);

    store.inject_failure("/raw/notes.txt", Failure::Authentication);
    assert!(matches!(
        fs.exists("/raw/notes.txt").await,
        Err(FsError::Authentication(_))
    ));
    assert!(matches!(
        fs.is_file("/raw/notes.txt").await,
        Err(FsError::Authentication(_))
    ));
    Ok(())
}

#[compio::test]
async fn test_ls_without_info_uses_name_listing() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store.clone(), "dataplatformdls");

    let entries: Vec<DirEntry> = fs.ls("/raw", false).try_collect().await?;
    assert_eq!(
        paths(&entries),
        vec!["/raw/2020", "/raw/empty.txt", "/raw/notes.txt"]
    );
    assert!(entries.iter().all(|e| e.info.is_none()));
    assert_eq!(store.calls(), vec![ClientCall::Gen1Ls("/raw".into())]);
    Ok(())
}

#[compio::test]
async fn test_ls_with_info_uses_detailed_listing() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store.clone(), "dataplatformdls");

    let entries: Vec<DirEntry> = fs.ls("/raw", true).try_collect().await?;
    let kinds: Vec<(&str, FileType, u64)> = entries
        .iter()
        .map(|e| {
            let info = e.info.as_ref().unwrap();
            (e.path.as_str(), info.file_type, info.size)
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("/raw/2020", FileType::Directory, 0),
            ("/raw/empty.txt", FileType::File, 0),
            ("/raw/notes.txt", FileType::File, 13),
        ]
    );
    assert_eq!(store.calls(), vec![ClientCall::Gen1LsDetail("/raw".into())]);
    Ok(())
}

#[compio::test]
async fn test_ls_is_lazy() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store.clone(), "dataplatformdls");

    let listing = fs.ls("/raw", true);
    assert!(store.calls().is_empty());
    drop(listing);
    assert!(store.calls().is_empty());
    Ok(())
}

#[compio::test]
async fn test_walk_depth_first_visits_each_entry_once() -> anyhow::Result<()> {
    let store = sample_store()?;
    let fs = Gen1FileSystem::new(store.clone(), "dataplatformdls");

    let entries: Vec<DirEntry> = fs.walk("/raw", true).try_collect().await?;
    assert_eq!(
        paths(&entries),
        vec![
            "/raw/2020",
            "/raw/empty.txt",
            "/raw/notes.txt",
            "/raw/2020/01",
            "/raw/2020/summary.csv",
            "/raw/2020/01/events.json",
        ]
    );
    assert!(entries.iter().all(|e| e.info.is_some()));

    // One detailed listing per directory, none for files
    assert_eq!(
        store.calls(),
        vec![
            ClientCall::Gen1LsDetail("/raw".into()),
            ClientCall::Gen1LsDetail("/raw/2020".into()),
            ClientCall::Gen1LsDetail("/raw/2020/01".into()),
        ]
    );
    Ok(())
}

#[compio::test]
async fn test_walk_stops_at_first_error() -> anyhow::Result<()> {
    let store = sample_store()?;
    store.add_file("/raw/zz/late.txt", "x")?;
    store.inject_failure("/raw/2020", Failure::Transport);
    let fs = Gen1FileSystem::new(store, "dataplatformdls");

    let results: Vec<Result<DirEntry>> = fs.walk("/raw", false).collect().await;
    let (ok, err): (Vec<_>, Vec<_>) = results.into_iter().partition(Result::is_ok);
    assert_eq!(ok.len(), 4);
    assert_eq!(err.len(), 1);
    assert!(matches!(err[0], Err(FsError::Transport(_))));
    Ok(())
}

#[compio::test]
async fn test_unknown_type_is_decode_error() -> anyhow::Result<()> {
    let fs = Gen1FileSystem::new(SymlinkClient, "links");

    assert!(matches!(
        fs.info("/links/current").await,
        Err(FsError::Decode(_))
    ));
    assert!(matches!(
        fs.is_dir("/links/current").await,
        Err(FsError::Decode(_))
    ));

    let listed: Result<Vec<DirEntry>> = fs.ls("/links", true).try_collect().await;
    assert!(matches!(listed, Err(FsError::Decode(_))));

    let walked: Result<Vec<DirEntry>> = fs.walk("/links", false).try_collect().await;
    assert!(matches!(walked, Err(FsError::Decode(_))));
    Ok(())
}
