//! Discovery of installed plugins

use crate::manifest::Manifest;
use plugsync_fs::{PluginPath, canonicalize, has_manifest, is_aside_name};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

/// A plugin directory found under one of the search roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledArtifact {
    /// Directory name as listed in its root
    pub name: String,
    /// Canonical path
    pub path: PathBuf,
    pub manifest: Manifest,
}

impl InstalledArtifact {
    pub fn version(&self) -> Option<&str> {
        self.manifest.version()
    }
}

/// Find every plugin whose directory name starts with `prefix`.
///
/// Roots are visited in order and each listing is sorted by name. A
/// directory reachable from several roots (or through a symlink) is
/// reported once, at its first sighting. An unreadable manifest yields an
/// empty one rather than dropping the plugin. Previous versions that were
/// renamed aside during an update are never reported.
pub fn scan(prefix: &str, roots: &[PathBuf]) -> Vec<InstalledArtifact> {
    if prefix.is_empty() {
        tracing::warn!("No organization prefix specified");
        return Vec::new();
    }

    tracing::info!(prefix, roots = ?roots, "Scanning for plugins");

    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for root in roots {
        if !root.is_dir() {
            tracing::warn!(path = %root.display(), "Plugin directory doesn't exist");
            continue;
        }

        let mut entries: Vec<_> = match fs::read_dir(root) {
            Ok(entries) => entries.flatten().collect(),
            Err(e) => {
                tracing::warn!(path = %root.display(), "Could not list plugin directory: {}", e);
                continue;
            }
        };
        entries.sort_by_key(|e| e.file_name());

        tracing::debug!(path = %root.display(), count = entries.len(), "Scanning directory");

        for entry in entries {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::debug!(path = %entry.path().display(), "Skipping non UTF-8 name");
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }
            if is_aside_name(&name) {
                tracing::debug!(plugin = %name, "Skipping renamed-aside previous version");
                continue;
            }

            let path = canonicalize(entry.path());
            if !seen.insert(path.clone()) {
                tracing::debug!(path = %path.display(), "Skipping duplicate plugin path");
                continue;
            }

            if !path.is_dir() || !has_manifest(&path) {
                tracing::warn!(
                    plugin = %name,
                    "Plugin is missing metadata or not a directory"
                );
                continue;
            }

            let manifest = match Manifest::load(&path.join(PluginPath::Manifest)) {
                Ok(manifest) => manifest,
                Err(e) => {
                    tracing::warn!(plugin = %name, "Ignoring unreadable metadata: {}", e);
                    Manifest::default()
                }
            };

            tracing::info!(plugin = %name, path = %path.display(), "Found matching plugin");
            found.push(InstalledArtifact {
                name,
                path,
                manifest,
            });
        }
    }

    tracing::info!("Found {} unique matching plugins", found.len());
    found
}
