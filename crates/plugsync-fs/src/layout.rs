//! Repository layout detection
//!
//! A cloned repository either is a plugin (manifest at its root) or holds
//! several plugins, one per immediate subdirectory. The same resolution is
//! used to read the remote version and to pick the tree that gets
//! installed, so the two can never disagree.

use crate::constants::PluginPath;
use std::fs;
use std::path::{Path, PathBuf};

/// Which repository shape a source subtree was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLayout {
    /// Manifest at the repository root
    SingleArtifact,
    /// Manifest inside a subdirectory named after the plugin
    MultiArtifact,
}

/// The directory inside a clone that holds the content to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSubtree {
    pub path: PathBuf,
    pub layout: SourceLayout,
}

impl SourceSubtree {
    /// Path of the manifest inside this subtree.
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(PluginPath::Manifest)
    }
}

/// Whether `dir` directly contains a plugin manifest.
pub fn has_manifest(dir: &Path) -> bool {
    dir.join(PluginPath::Manifest).is_file()
}

/// Locate the subtree for `artifact_name` inside a cloned repository.
///
/// Precedence:
/// 1. manifest at the root (single-artifact repository)
/// 2. subdirectory whose name equals `artifact_name` exactly
/// 3. subdirectory whose name equals it ignoring case
///
/// Returns `None` when none apply; an arbitrary subtree is never chosen.
pub fn resolve_source(snapshot: &Path, artifact_name: &str) -> Option<SourceSubtree> {
    if has_manifest(snapshot) {
        tracing::info!("Found manifest in repository root, treating as single plugin repository");
        return Some(SourceSubtree {
            path: snapshot.to_path_buf(),
            layout: SourceLayout::SingleArtifact,
        });
    }

    let mut candidates: Vec<(String, PathBuf)> = match fs::read_dir(snapshot) {
        Ok(entries) => entries
            .flatten()
            .filter(|e| e.file_name() != PluginPath::GitDir.as_str())
            .filter_map(|e| {
                let path = e.path();
                let name = e.file_name().into_string().ok()?;
                (path.is_dir() && has_manifest(&path)).then_some((name, path))
            })
            .collect(),
        Err(e) => {
            tracing::warn!(path = %snapshot.display(), "Cannot list repository: {}", e);
            return None;
        }
    };
    candidates.sort();

    let multi = |path: &PathBuf| SourceSubtree {
        path: path.clone(),
        layout: SourceLayout::MultiArtifact,
    };

    if let Some((_, path)) = candidates.iter().find(|(name, _)| name == artifact_name) {
        tracing::info!("Exact match found for plugin: {}", artifact_name);
        return Some(multi(path));
    }

    if candidates.is_empty() {
        tracing::warn!("No plugin directories found in repository");
        return None;
    }

    let names: Vec<&str> = candidates.iter().map(|(n, _)| n.as_str()).collect();
    tracing::info!(
        "Found {} plugins in repository: {}",
        names.len(),
        names.join(", ")
    );

    let wanted = artifact_name.to_lowercase();
    if let Some((name, path)) = candidates.iter().find(|(name, _)| name.to_lowercase() == wanted) {
        tracing::info!("Found case-insensitive match: {}", name);
        return Some(multi(path));
    }

    tracing::warn!("No subdirectory matching plugin name '{}'", artifact_name);
    None
}
