//! Populate an installed plugin directory from a source subtree

use crate::constants::PluginPath;
use crate::remove::{RemovalOutcome, Remover};
use crate::{Error, Result};
use std::fs::{self, File, FileTimes};
use std::path::Path;

/// Result of [`replace_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceReport {
    pub removal: RemovalOutcome,
    /// Diagnostic count; see [`install_from`]
    pub entries_copied: usize,
}

/// Remove `dest` completely, then install `source` into it.
///
/// The removal finishes (or renames the old tree aside) before anything
/// is written, so old and new content are never merged.
pub fn replace_dir(remover: &Remover, source: &Path, dest: &Path) -> Result<ReplaceReport> {
    tracing::info!(path = %dest.display(), "Removing old plugin");
    let removal = remover.remove(dest)?;
    tracing::info!(
        from = %source.display(),
        to = %dest.display(),
        "Copying new plugin files"
    );
    let entries_copied = install_from(source, dest)?;
    Ok(ReplaceReport {
        removal,
        entries_copied,
    })
}

/// Recreate `dest` and copy every entry of `source` into it.
///
/// `.git` directories are skipped at every depth. File access and
/// modification times are preserved where the platform allows it.
///
/// Returns a diagnostic count: each top-level file counts one, each
/// top-level directory counts its immediate children.
///
/// # Errors
///
/// Returns [`Error::Copy`] on the first failure. The destination is left
/// as far as the copy got.
pub fn install_from(source: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest).map_err(|e| Error::copy(source, dest, e))?;

    let mut copied = 0;
    for entry in sorted_entries(source, dest)? {
        if entry.file_name() == PluginPath::GitDir.as_str() {
            continue;
        }
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let meta = fs::metadata(&from).map_err(|e| Error::copy(&from, &to, e))?;

        if meta.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else {
            copy_file(&from, &to)?;
            copied += 1;
        }
    }

    tracing::info!("Copied {} files to {}", copied, dest.display());
    Ok(copied)
}

/// Copy a directory recursively; returns the number of immediate children.
fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to).map_err(|e| Error::copy(from, to, e))?;

    let mut children = 0;
    for entry in sorted_entries(from, to)? {
        if entry.file_name() == PluginPath::GitDir.as_str() {
            continue;
        }
        children += 1;
        let src = entry.path();
        let dst = to.join(entry.file_name());
        let meta = fs::metadata(&src).map_err(|e| Error::copy(&src, &dst, e))?;
        if meta.is_dir() {
            copy_tree(&src, &dst)?;
        } else {
            copy_file(&src, &dst)?;
        }
    }
    Ok(children)
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    let meta = fs::metadata(from).map_err(|e| Error::copy(from, to, e))?;
    fs::copy(from, to).map_err(|e| Error::copy(from, to, e))?;

    let mut times = FileTimes::new();
    if let Ok(modified) = meta.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    // Read-only copies cannot be opened for writing; their times stay as copied
    match File::options().write(true).open(to) {
        Ok(file) => {
            if let Err(e) = file.set_times(times) {
                tracing::debug!(path = %to.display(), "Could not preserve timestamps: {}", e);
            }
        }
        Err(e) => {
            tracing::debug!(path = %to.display(), "Could not preserve timestamps: {}", e);
        }
    }
    Ok(())
}

/// Listing of `dir`, sorted by name; failures are copy failures into `dest`.
fn sorted_entries(dir: &Path, dest: &Path) -> Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| Error::copy(dir, dest, e))?
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| Error::copy(dir, dest, e))?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}
