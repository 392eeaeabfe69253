//! Shared test utilities for the plugsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: remote repositories built with the `git` CLI
//! - [`plugin`]: installed plugin directories and `metadata.txt` content
//! - [`logs`]: capturing `tracing` output for assertions

pub mod git;
pub mod logs;
pub mod plugin;
