//! Collaborator client abstractions
//!
//! The storage SDKs are external collaborators. These traits describe the
//! boundary they present to the core: listing, property fetch and download
//! primitives, plus the connectors that authenticate and build clients.
//!
//! # Implementations
//!
//! - `MemoryStore` - in-process store implementing both generations, used in tests
//! - SDK adapters - provided by the application embedding this crate

pub mod gen1;
pub mod gen2;
pub mod memory;

pub use gen1::{Gen1Client, Gen1Connector, Gen1Entry};
pub use gen2::{
    ContentSettings, FileProperties, Gen2Client, Gen2Connector, Gen2FileClient, PathProperties,
};
pub use memory::{ClientCall, Failure, MemoryConnector, MemoryFileClient, MemoryStore};
