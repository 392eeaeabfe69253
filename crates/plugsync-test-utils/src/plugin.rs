//! Installed plugin fixtures.

use std::fs;
use std::path::{Path, PathBuf};

/// `metadata.txt` content with a `[general]` section.
///
/// `None` leaves the `version` key out entirely.
pub fn metadata(name: &str, version: Option<&str>) -> String {
    let mut text = format!("[general]\nname={name}\n");
    if let Some(version) = version {
        text.push_str(&format!("version={version}\n"));
    }
    text
}

/// Create `<root>/<name>` with a `metadata.txt` and a marker file.
///
/// Returns the plugin directory.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn install_plugin(root: &Path, name: &str, version: Option<&str>) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir)
        .unwrap_or_else(|e| panic!("install_plugin: failed to create {}: {e}", dir.display()));
    fs::write(dir.join("metadata.txt"), metadata(name, version))
        .unwrap_or_else(|e| panic!("install_plugin: failed to write metadata: {e}"));
    fs::write(dir.join("installed.marker"), "local")
        .unwrap_or_else(|e| panic!("install_plugin: failed to write marker: {e}"));
    dir
}

/// Read the `version=` line back out of an installed plugin.
pub fn installed_version(dir: &Path) -> Option<String> {
    let text = fs::read_to_string(dir.join("metadata.txt")).ok()?;
    text.lines()
        .find_map(|line| line.strip_prefix("version="))
        .map(|v| v.trim().to_string())
}
