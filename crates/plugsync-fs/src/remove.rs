//! Removal of installed plugin directories that may hold locked files
//!
//! An ordinary recursive delete is tried first. When it fails because a
//! file is locked or read-only, the remover escalates once:
//!
//! 1. clear read-only flags under `.git` (pack files are the usual culprit)
//! 2. wait a fixed grace period so transient handles can close
//! 3. ask the platform for a forced delete
//! 4. rename the directory aside so the original path is free again
//!
//! Renamed-aside directories are hidden (`.<name>_old_<timestamp>`) so a
//! later prefix scan never picks them up as installed plugins.
//!
//! Only a failed rename is fatal. The grace period is a single wait, not a
//! retry loop.

use crate::constants::PluginPath;
use crate::platform::{NativePlatform, Platform, clear_readonly};
use crate::{Error, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default pause before the forced delete.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(2);

/// How a removal finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Nothing existed at the path
    Absent,
    /// Ordinary recursive delete succeeded
    Removed,
    /// Removed by the platform's forced delete
    Forced,
    /// Could not be deleted; moved to the given path instead
    RenamedAside(PathBuf),
}

/// Removes directories using the escalation described in the module docs.
#[derive(Debug, Clone)]
pub struct Remover {
    platform: Arc<dyn Platform>,
    grace: Duration,
}

impl Default for Remover {
    fn default() -> Self {
        Self::new(Arc::new(NativePlatform))
    }
}

impl Remover {
    pub fn new(platform: Arc<dyn Platform>) -> Self {
        Self {
            platform,
            grace: DEFAULT_GRACE,
        }
    }

    /// Set the pause taken before the forced delete.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn set_grace(&mut self, grace: Duration) {
        self.grace = grace;
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn platform(&self) -> &Arc<dyn Platform> {
        &self.platform
    }

    /// Remove `path`, escalating on lock failures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Removal`] when the ordinary delete fails for a
    /// reason other than locking, or when every fallback including the
    /// rename has failed.
    pub fn remove(&self, path: &Path) -> Result<RemovalOutcome> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RemovalOutcome::Absent),
            Err(source) => {
                return Err(Error::Removal {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let first = if meta.is_dir() {
            self.platform.remove_tree(path)
        } else {
            fs::remove_file(path)
        };

        match first {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed directory");
                return Ok(RemovalOutcome::Removed);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RemovalOutcome::Absent),
            Err(e) if !is_lock_error(&e) => {
                return Err(Error::Removal {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Removal blocked ({}), trying fallbacks",
                    e
                );
            }
        }

        let git_dir = path.join(PluginPath::GitDir);
        if git_dir.is_dir() {
            tracing::info!(path = %git_dir.display(), "Clearing read-only flags");
            clear_readonly(&git_dir);
        }

        if !self.grace.is_zero() {
            std::thread::sleep(self.grace);
        }

        match self.platform.force_delete(path) {
            Ok(()) if !path.exists() => {
                tracing::info!(path = %path.display(), "Forced removal succeeded");
                return Ok(RemovalOutcome::Forced);
            }
            Ok(()) => {
                tracing::warn!(path = %path.display(), "Directory still exists after forced removal");
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "Forced removal failed: {}", e);
            }
        }

        let aside = aside_path(path, Local::now());
        tracing::info!(
            path = %path.display(),
            aside = %aside.display(),
            "Renaming directory aside"
        );
        fs::rename(path, &aside).map_err(|source| {
            tracing::error!(path = %path.display(), "Failed to remove directory using all methods: {}", source);
            Error::Removal {
                path: path.to_path_buf(),
                source,
            }
        })?;

        Ok(RemovalOutcome::RenamedAside(aside))
    }
}

const ASIDE_MARKER: &str = "_old_";
const ASIDE_STAMP_LEN: usize = 14;

/// Name used when a directory has to be moved out of the way.
///
/// `.<name>_old_<YYYYmmddHHMMSS>`, next to the original.
pub fn aside_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    if let Some(original) = path.file_name() {
        name.push(original);
    }
    name.push(format!("{ASIDE_MARKER}{}", now.format("%Y%m%d%H%M%S")));
    path.with_file_name(name)
}

/// Whether `name` looks like a directory produced by [`aside_path`].
///
/// Also matches the unhidden `<name>_old_<timestamp>` form left behind by
/// older releases.
pub fn is_aside_name(name: &str) -> bool {
    let Some(idx) = name.rfind(ASIDE_MARKER) else {
        return false;
    };
    let stamp = &name[idx + ASIDE_MARKER.len()..];
    idx > 0 && stamp.len() == ASIDE_STAMP_LEN && stamp.bytes().all(|b| b.is_ascii_digit())
}

/// Errors that mean "something holds this file", as opposed to real failures.
pub fn is_lock_error(error: &io::Error) -> bool {
    match error.kind() {
        io::ErrorKind::PermissionDenied
        | io::ErrorKind::ResourceBusy
        | io::ErrorKind::DirectoryNotEmpty => true,
        // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
        _ if cfg!(windows) => matches!(error.raw_os_error(), Some(32) | Some(33)),
        _ => false,
    }
}
