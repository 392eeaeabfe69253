//! Effective configuration for a command
//!
//! Precedence, lowest first: defaults, configuration file, `PLUGSYNC_*`
//! environment variables, command-line flags.

use std::path::{Path, PathBuf};

use plugsync_core::{FileSecretStore, SyncConfig};

use crate::cli::Overrides;
use crate::error::Result;

/// Configuration file location plus the merged settings.
#[derive(Debug, Clone)]
pub struct Context {
    pub path: PathBuf,
    pub config: SyncConfig,
    /// Whether `path` existed when loaded
    pub file_found: bool,
}

impl Context {
    pub fn load(explicit: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => SyncConfig::default_path()?,
        };
        let file_found = path.exists();
        let mut config = SyncConfig::load_or_default(&path)?;
        config.apply_env();
        apply_overrides(&mut config, overrides);
        tracing::debug!(path = %path.display(), found = file_found, "Resolved configuration");

        Ok(Self {
            path,
            config,
            file_found,
        })
    }

    /// Secrets live next to the configuration file.
    pub fn secret_store(&self) -> FileSecretStore {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        FileSecretStore::in_dir(dir)
    }
}

pub fn apply_overrides(config: &mut SyncConfig, overrides: &Overrides) {
    if let Some(prefix) = &overrides.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(repository) = &overrides.repository {
        config.repository = repository.clone();
    }
    if let Some(branch) = &overrides.branch {
        config.branch = branch.clone();
    }
    if !overrides.roots.is_empty() {
        config.search_roots = overrides.roots.clone();
    }
    if let Some(git_path) = &overrides.git_path {
        config.git_path = Some(git_path.clone());
    }
}
