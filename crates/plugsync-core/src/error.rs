//! Error types for plugsync-core

use crate::manifest::SyntaxError;
use std::path::PathBuf;

/// Result type for plugsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Git could not be found or run; aborts a batch before any clone
    #[error("Git is not installed or could not be found ({tool})")]
    ToolUnavailable { tool: String },

    /// Configuration file not found at expected path
    #[error("Configuration not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration present but unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// No per-user configuration directory on this system
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    /// Manifest file is not valid INI
    #[error("Failed to parse manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: SyntaxError,
    },

    /// Sealing or unsealing a secret failed
    #[error("Secret store error: {message}")]
    Secret { message: String },

    /// A sealed handle that the store does not know
    #[error("No stored secret matches the configured token handle")]
    UnknownSecret,

    /// Secrets file readable by other users
    #[error("Refusing to read {path}: it is accessible by other users (expected mode 600)")]
    InsecureSecrets { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from plugsync-fs
    #[error(transparent)]
    Fs(#[from] plugsync_fs::Error),

    /// Git error from plugsync-git
    #[error(transparent)]
    Git(#[from] plugsync_git::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
