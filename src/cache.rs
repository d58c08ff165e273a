use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::work_item::CacheKey;

pub mod file_cache;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("could not move artifact into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Where artifacts live. Presence of an artifact is the only dedup signal.
pub trait CacheStore {
    fn exists(&self, key: &CacheKey) -> bool;
    fn path_for(&self, key: &CacheKey) -> PathBuf;
    /// Stores `bytes` under `key`, replacing any previous artifact.
    fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<PathBuf, CacheError>;
}
