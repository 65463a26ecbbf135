//! Destination file lifecycle.
//!
//! One handle is opened before partitioning and shared by every worker.
//! Writes are positional (pwrite), so workers writing disjoint ranges need no
//! lock around the write. Data lands in `<name>.part` and is renamed to the
//! final name once the whole file is verified.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
#[cfg(unix)]
use std::os::unix::fs::FileExt;

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `ggml-base.bin` → `ggml-base.bin.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Shared writer for a download file. Safe to clone and use from multiple
/// threads; each `write_at` is independent of any file cursor.
#[derive(Debug, Clone)]
pub struct StorageWriter {
    file: Arc<File>,
    path: PathBuf,
}

impl StorageWriter {
    /// Create (or truncate) the file at `path` for writing.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            file: Arc::new(file),
            path: path.to_path_buf(),
        })
    }

    /// Write all of `data` at `offset`. Does not move the file's cursor.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        self.file.write_all_at(data, offset)
    }

    /// Windows: `seek_write` also takes an explicit offset.
    #[cfg(windows)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        use std::os::windows::fs::FileExt;
        let mut written = 0;
        while written < data.len() {
            let n = self
                .file
                .seek_write(&data[written..], offset + written as u64)?;
            if n == 0 {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "short write"));
            }
            written += n;
        }
        Ok(())
    }

    /// Current on-disk length.
    pub fn len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Rename the file to `final_path`. Consumes the writer and closes this
    /// handle; clones must already be dropped on platforms that refuse to
    /// rename open files.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let path = self.path.clone();
        drop(self.file);
        std::fs::rename(&path, final_path)
    }
}
