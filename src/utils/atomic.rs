//! Atomic file replacement
//!
//! The store file is rewritten as a whole on every change:
//!
//! 1. Write to `<file>.tmp`
//! 2. `sync_all()` to flush to disk
//! 3. Rename over the target (atomic on most filesystems)
//!
//! A reader therefore sees either the previous or the new file, never a
//! partial one.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type for atomic operations
pub type AtomicResult<T> = Result<T, AtomicError>;

/// Errors that can occur during atomic operations
#[derive(Debug, Error)]
pub enum AtomicError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Path of the scratch file used while replacing `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Atomically replace `path` with whatever `write_fn` writes
///
/// The writer is buffered; it is flushed and synced before the rename.
pub fn atomic_write_with<P, F>(path: P, write_fn: F) -> AtomicResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut dyn Write) -> io::Result<()>,
{
    let path = path.as_ref();
    let temp_path = temp_path_for(path);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(file);
    if let Err(e) = write_fn(&mut writer) {
        drop(writer);
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Remove a scratch file left behind by an interrupted write
///
/// Returns `true` if one was found and deleted.
pub fn cleanup_temp_file<P: AsRef<Path>>(path: P) -> AtomicResult<bool> {
    let temp_path = temp_path_for(path.as_ref());
    if !temp_path.exists() {
        return Ok(false);
    }
    fs::remove_file(&temp_path)?;
    Ok(true)
}
