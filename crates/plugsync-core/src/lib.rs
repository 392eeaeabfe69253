//! Core orchestration layer for plugsync
//!
//! This crate ties the filesystem and git layers into a plugin updater:
//!
//! - **Scanning**: find installed plugins by directory-name prefix
//! - **Manifests**: parse `metadata.txt` and read its `version`
//! - **Configuration**: [`SyncConfig`] with file, environment and flag sources
//! - **Secrets**: keep tokens out of the configuration file
//! - **SyncEngine**: compare versions and replace outdated plugins
//!
//! # Architecture
//!
//! ```text
//!           plugsync (CLI)
//!                 |
//!          plugsync-core
//!                 |
//!       +---------+---------+
//!       |                   |
//!  plugsync-fs        plugsync-git
//! ```
//!
//! # Example
//!
//! ```no_run
//! use plugsync_core::{Result, SyncConfig, SyncEngine, SyncOptions};
//! use plugsync_git::GitClient;
//!
//! fn example(config: SyncConfig) -> Result<()> {
//!     let client = GitClient::new(config.git_path.as_deref());
//!     let mut engine = SyncEngine::new(config, client);
//!     let report = engine.run(&SyncOptions::default())?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod report;
pub mod scan;
pub mod secrets;

pub use config::SyncConfig;
pub use engine::{SyncEngine, SyncOptions, UNKNOWN_VERSION};
pub use error::{Error, Result};
pub use manifest::{Manifest, SyntaxError};
pub use report::{ArtifactOutcome, ArtifactStatus, BatchReport};
pub use scan::{InstalledArtifact, scan};
pub use secrets::{Base64SecretStore, FileSecretStore, SecretStore};
