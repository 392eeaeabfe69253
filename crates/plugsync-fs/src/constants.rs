//! Well-known names inside plugin directories and clones.

use std::path::Path;

/// Standard plugin filesystem markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginPath {
    /// The `metadata.txt` manifest that marks a directory as a plugin
    Manifest,
    /// The `.git` directory (never installed, often holds locked files)
    GitDir,
}

impl PluginPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "metadata.txt",
            Self::GitDir => ".git",
        }
    }
}

impl AsRef<Path> for PluginPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PluginPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PluginPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
