use chrono::{DateTime, TimeZone, Utc};
use dlfs::cli::{DownloadConfig, Generation, StoreConfig};
use dlfs::client::MemoryStore;
use dlfs::DirEntry;

/// Tree shared by the backend tests
///
/// ```text
/// /raw
/// ├── 2020
/// │   ├── 01
/// │   │   └── events.json   (12430 bytes)
/// │   └── summary.csv       ("a,b\n1,2\n")
/// ├── empty.txt             (0 bytes)
/// └── notes.txt             ("héllo wörld")
/// ```
#[allow(dead_code)]
pub fn sample_store() -> anyhow::Result<MemoryStore> {
    let store = MemoryStore::new();
    store.add_file("/raw/2020/01/events.json", vec![b'x'; 12430])?;
    store.add_file("/raw/2020/summary.csv", "a,b\n1,2\n")?;
    store.add_file("/raw/empty.txt", Vec::new())?;
    store.add_file("/raw/notes.txt", "héllo wörld")?;
    store.clear_calls();
    Ok(store)
}

/// Fixed UTC instant used for timestamp assertions
#[allow(dead_code)]
pub fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

#[allow(dead_code)]
pub fn paths(entries: &[DirEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.path.as_str()).collect()
}

/// Store configuration with interactive login and default download limits
#[allow(dead_code)]
pub fn store_config(generation: Generation) -> StoreConfig {
    StoreConfig {
        generation,
        store_name: Some("dataplatformdls".to_string()),
        account_name: Some("dataplatformacct".to_string()),
        file_system_name: Some("raw".to_string()),
        interactive: true,
        adl_secret: None,
        download: DownloadConfig::default(),
    }
}
