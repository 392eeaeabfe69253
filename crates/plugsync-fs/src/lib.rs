//! Filesystem layer for plugsync
//!
//! Provides the pieces of a plugin update that touch the disk: locating
//! the source tree inside a clone, removing an installed plugin even when
//! files are locked, and repopulating it from the clone.

pub mod config;
pub mod constants;
pub mod error;
pub mod install;
pub mod io;
pub mod layout;
pub mod path;
pub mod platform;
pub mod remove;

pub use config::ConfigStore;
pub use constants::PluginPath;
pub use error::{Error, Result};
pub use install::{ReplaceReport, install_from, replace_dir};
pub use layout::{SourceLayout, SourceSubtree, has_manifest, resolve_source};
pub use path::canonicalize;
pub use platform::{NativePlatform, Platform};
pub use remove::{RemovalOutcome, Remover, is_aside_name};
