//! Persisting rendered reports to disk.
//!
//! The store owns every piece of file I/O in the crate.  Reports are written
//! through a temporary file in the destination directory and published with a
//! rename, so a failed write never leaves a file that looks complete.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use log::debug;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors raised while persisting a rendered report.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The destination directory or temporary file could not be written.
    #[error("failed to write report file: {0}")]
    Io(#[from] std::io::Error),
    /// The completed temporary file could not be published at its final path.
    #[error("failed to publish report file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Destination for rendered report bytes.
pub trait ReportStore {
    /// Writes the bytes to a freshly derived path and returns that path.
    ///
    /// Implementations must guarantee that no partially written file is ever
    /// reported as success.
    fn save(&self, bytes: &[u8]) -> Result<PathBuf, StorageError>;
}

/// Stores reports as timestamped files in a fixed directory.
///
/// File names follow the `CarReport_<YYYYMMDD>_<HHMMSS>.pdf` pattern; when a
/// second report lands within the same second a `_1`, `_2`, … suffix keeps
/// the paths distinct.
#[derive(Clone, Debug)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    /// Creates a store rooted at `dir`.  The directory is created on demand.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportStore for DirectoryStore {
    fn save(&self, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(bytes)?;
        file.as_file().sync_all()?;

        // Publishing must never clobber an existing report, even when another
        // writer races for the same timestamp, so the rename refuses to
        // overwrite and the next suffix is tried instead.
        let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let mut counter = 0;
        loop {
            let name = if counter == 0 {
                format!("CarReport_{}.pdf", stamp)
            } else {
                format!("CarReport_{}_{}.pdf", stamp, counter)
            };
            let path = self.dir.join(name);
            match file.persist_noclobber(&path) {
                Ok(_) => {
                    debug!("stored report at {}", path.display());
                    return Ok(path);
                }
                Err(err) if err.error.kind() == std::io::ErrorKind::AlreadyExists => {
                    file = err.file;
                    counter += 1;
                }
                Err(err) => return Err(StorageError::Persist(err)),
            }
        }
    }
}
