//! Store implementations
//!
//! Contains LogStore and FileStore.

mod file;
mod log;

pub use self::file::{FileStore, FileStoreConfig};
pub use self::log::LogStore;
