//! Error types for plugsync-git

use std::path::PathBuf;
use std::time::Duration;

/// Result type for plugsync-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in plugsync-git operations
///
/// Every string carried here has already been through
/// [`redact`](crate::redact); none of them contain credentials.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git is not installed or could not be found ({tool})")]
    ToolUnavailable { tool: String },

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clone {url}: {message}")]
    Clone { url: String, message: String },

    #[error("Cloning {url} did not finish within {}s", timeout.as_secs())]
    CloneTimeout { url: String, timeout: Duration },

    #[error("Could not prepare snapshot directory {path}: {source}")]
    Snapshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Filesystem error: {0}")]
    Fs(#[from] plugsync_fs::Error),
}
