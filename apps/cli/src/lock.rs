//! Single-instance guard.
//!
//! A file-based advisory lock prevents two concurrent runs of the same
//! ingestion type from interleaving writes. The lock is released by the
//! OS when the process exits, so a crashed run never wedges the next
//! one. "Already held" is a distinguishable outcome with its own exit
//! code, not an application error.

use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use networth_core::{Error, Result};

/// Holds an exclusive advisory lock for the lifetime of the value.
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Tries to acquire the lock without blocking. Returns
    /// [`Error::AlreadyRunning`] when another process holds it.
    pub fn acquire(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)?;

        if file.try_lock_exclusive().is_err() {
            return Err(Error::AlreadyRunning(format!(
                "lock file: {}",
                path.display()
            )));
        }

        let _ = writeln!(file, "{}", std::process::id());
        let _ = file.flush();

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}
