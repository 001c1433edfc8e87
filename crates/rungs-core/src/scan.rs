//! Migration directory scanning
//!
//! The scanner makes no ordering promise; entries come back in whatever order
//! the filesystem reports them. See [`crate::order`] for the application order.

use crate::descriptor::Migration;
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// List the regular files directly inside `dir`.
///
/// Subdirectories are skipped, not descended into.
pub fn scan_directory(dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| CoreError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CoreError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| CoreError::io(&entry.path(), e))?;
        let path = entry.path();

        // Follow symlinks so a linked migration file still counts
        let is_file = if file_type.is_symlink() {
            path.is_file()
        } else {
            file_type.is_file()
        };
        if is_file {
            files.push(path);
        }
    }
    Ok(files)
}

/// Scan `dir` and parse every file into a [`Migration`].
///
/// The result is in scan order. Any unreadable or badly named file fails the
/// whole directory; no partial list is returned.
pub fn load_migrations(dir: &Path) -> CoreResult<Vec<Migration>> {
    let files = scan_directory(dir)?;
    log::debug!("Found {} migration files in {}", files.len(), dir.display());

    files.iter().map(|path| Migration::load(path)).collect()
}
