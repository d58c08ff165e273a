use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use super::{CacheError, CacheStore};
use crate::image::encoder::OutputFormat;
use crate::work_item::CacheKey;

pub struct FileCache {
    catalog: PathBuf,
    format: OutputFormat,
}

impl FileCache {
    /// Opens the catalog, creating it when absent.
    pub fn open(catalog: &Path, format: OutputFormat) -> io::Result<FileCache> {
        fs::create_dir_all(catalog)?;
        Ok(FileCache {
            catalog: catalog.to_path_buf(),
            format,
        })
    }

    pub fn catalog(&self) -> &Path {
        &self.catalog
    }

    pub fn generate_file_name(key: &CacheKey, format: OutputFormat) -> String {
        format!("{}.{}", key.as_str(), format.extension())
    }
}

impl CacheStore for FileCache {
    fn exists(&self, key: &CacheKey) -> bool {
        self.path_for(key).is_file()
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.catalog.join(FileCache::generate_file_name(key, self.format))
    }

    fn write(&self, key: &CacheKey, bytes: &[u8]) -> Result<PathBuf, CacheError> {
        let path = self.path_for(key);
        let mut file = NamedTempFile::new_in(&self.catalog)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;
        file.persist(&path)?;
        debug!("Stored {} bytes at {:?}", bytes.len(), path);
        return Ok(path);
    }
}
