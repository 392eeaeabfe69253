//! Git client for plugsync
//!
//! Wraps the external `git` executable: finds it, checks that it runs, and
//! produces shallow single-branch snapshots of a remote repository in
//! ephemeral directories.

pub mod client;
pub mod credentials;
pub mod error;
pub mod process;
pub mod remote;
pub mod source;
pub mod tool;

pub use client::{DEFAULT_CLONE_TIMEOUT, GitClient};
pub use credentials::{Credentials, redact};
pub use error::{Error, Result};
pub use remote::{RemoteIdentity, is_secure_transport};
pub use source::RemoteSource;
pub use tool::ToolPath;
