//! RemoteSource trait

use crate::Result;
use crate::credentials::Credentials;
use std::path::PathBuf;

/// Something that can materialize a remote repository on local disk.
///
/// Implementations hold at most one snapshot at a time: `acquire`
/// releases the previous one first, and `release` is idempotent.
pub trait RemoteSource {
    /// Human-readable description of the underlying tool.
    fn describe(&self) -> String;

    /// Whether snapshots can be acquired at all.
    fn is_available(&self) -> bool;

    /// Fetch `branch` of `url` into a fresh ephemeral directory.
    fn acquire(
        &mut self,
        url: &str,
        branch: &str,
        credentials: Option<&Credentials>,
    ) -> Result<PathBuf>;

    /// Destroy the current snapshot, if any.
    fn release(&mut self);
}
