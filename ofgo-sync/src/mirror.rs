//! Delete-then-copy directory mirroring.
//!
//! `mirror(src, dst)` leaves `dst` as an exact copy of `src`. The operation
//! is idempotent but not atomic: a crash between the delete and the end of
//! the copy leaves `dst` partially populated, and re-running restores it.
//! A copy-to-temp-then-rename strategy would close that window if trees ever
//! grow large or gain concurrent writers.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{io_err, SyncError};

/// Replace `dst` with a recursive copy of `src`.
///
/// Parent directories of `dst` are created. Symlinks inside `src` are
/// recreated as symlinks on unix and copied as their targets elsewhere.
pub fn mirror(src: &Path, dst: &Path) -> Result<(), SyncError> {
    if !src.exists() {
        return Err(SyncError::SourceMissing {
            path: src.to_path_buf(),
        });
    }
    if same_path(src, dst) {
        return Err(SyncError::SelfMirror {
            path: src.to_path_buf(),
        });
    }

    remove_path(dst)?;
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    copy_tree(src, dst)?;
    tracing::debug!("mirrored {} -> {}", src.display(), dst.display());
    Ok(())
}

/// Remove a file, symlink or directory tree at `path`. Absent paths are a no-op.
pub fn remove_path(path: &Path) -> Result<(), SyncError> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(io_err(path, e)),
    };
    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| io_err(path, e))
}

/// Create `path` and its parents if missing.
pub fn ensure_dir(path: &Path) -> Result<(), SyncError> {
    fs::create_dir_all(path).map_err(|e| io_err(path, e))
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), SyncError> {
    let meta = fs::symlink_metadata(src).map_err(|e| io_err(src, e))?;
    if meta.file_type().is_symlink() {
        return copy_symlink(src, dst);
    }
    if meta.is_file() {
        fs::copy(src, dst).map_err(|e| io_err(src, e))?;
        return Ok(());
    }

    fs::create_dir(dst).map_err(|e| io_err(dst, e))?;
    let mut entries: Vec<_> = fs::read_dir(src)
        .map_err(|e| io_err(src, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| io_err(src, e))?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), SyncError> {
    let target = fs::read_link(src).map_err(|e| io_err(src, e))?;
    std::os::unix::fs::symlink(&target, dst).map_err(|e| io_err(dst, e))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), SyncError> {
    if src.is_dir() {
        fs::create_dir(dst).map_err(|e| io_err(dst, e))?;
        for entry in fs::read_dir(src).map_err(|e| io_err(src, e))? {
            let entry = entry.map_err(|e| io_err(src, e))?;
            copy_tree(&entry.path(), &dst.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(src, dst).map(|_| ()).map_err(|e| io_err(src, e))
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
