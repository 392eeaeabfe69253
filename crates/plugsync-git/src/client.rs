//! GitClient: shallow clones into a single ephemeral snapshot slot

use crate::credentials::{Credentials, redact};
use crate::process::run_with_timeout;
use crate::remote::is_secure_transport;
use crate::source::RemoteSource;
use crate::tool::ToolPath;
use crate::{Error, Result};
use plugsync_fs::{NativePlatform, Platform, Remover};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Default wall-clock limit for a clone.
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(300);

const SNAPSHOT_PREFIX: &str = "plugsync-";

/// Runs `git clone --depth 1` into ephemeral directories.
///
/// Holds at most one snapshot. A new clone destroys the previous snapshot
/// first, and dropping the client destroys whatever is left.
#[derive(Debug)]
pub struct GitClient {
    tool: ToolPath,
    remover: Remover,
    timeout: Duration,
    temp_root: PathBuf,
    snapshot: Option<PathBuf>,
}

impl GitClient {
    /// Create a client on the native platform, locating git once.
    pub fn new(git_path: Option<&Path>) -> Self {
        Self::with_platform(git_path, Arc::new(NativePlatform))
    }

    /// Create a client with an explicit platform implementation.
    pub fn with_platform(git_path: Option<&Path>, platform: Arc<dyn Platform>) -> Self {
        let tool = ToolPath::locate(git_path, platform.as_ref());
        tracing::info!(tool = %tool, "Initialized git client");
        Self {
            tool,
            remover: Remover::new(platform),
            timeout: DEFAULT_CLONE_TIMEOUT,
            temp_root: std::env::temp_dir(),
            snapshot: None,
        }
    }

    /// Limit how long a single clone may run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pause used by snapshot removal before forcing a delete.
    pub fn with_removal_grace(mut self, grace: Duration) -> Self {
        self.remover.set_grace(grace);
        self
    }

    /// Directory under which snapshots are created.
    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    pub fn tool(&self) -> &ToolPath {
        &self.tool
    }

    /// Current snapshot directory, if one is live.
    pub fn snapshot(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }

    pub fn is_tool_available(&self) -> bool {
        tracing::info!(tool = %self.tool, "Checking if Git is installed");
        self.tool.is_available()
    }

    /// Shallow-clone `branch` of `url` into a new snapshot directory.
    ///
    /// Credentials are only used for `https` URLs; for anything else they
    /// are dropped with a warning.
    ///
    /// # Errors
    ///
    /// - [`Error::Snapshot`] when the ephemeral directory cannot be made
    /// - [`Error::Spawn`] when git cannot be started
    /// - [`Error::Clone`] when git exits non-zero
    /// - [`Error::CloneTimeout`] when the clone exceeds the timeout
    pub fn clone_repository(
        &mut self,
        url: &str,
        branch: &str,
        credentials: Option<&Credentials>,
    ) -> Result<PathBuf> {
        let credentials = match credentials {
            Some(creds) if !is_secure_transport(url) => {
                tracing::warn!(
                    "Authentication provided but URL doesn't use HTTPS, ignoring credentials: {}",
                    redact(url, &creds.secrets())
                );
                None
            }
            other => other,
        };
        let secrets = credentials.map(|c| c.secrets()).unwrap_or_default();
        let shown_url = redact(url, &secrets);

        if let Some(previous) = &self.snapshot {
            tracing::info!(path = %previous.display(), "Cleaning up existing snapshot");
            self.cleanup();
        }

        let dest = self.temp_root.join(format!(
            "{}{}",
            SNAPSHOT_PREFIX,
            Uuid::new_v4().simple()
        ));
        std::fs::create_dir_all(&dest).map_err(|source| Error::Snapshot {
            path: dest.clone(),
            source,
        })?;
        self.snapshot = Some(dest.clone());
        tracing::info!(path = %dest.display(), "Created snapshot directory");

        tracing::info!(
            "Running git clone --depth 1 --branch {} {} {}",
            branch,
            shown_url,
            dest.display()
        );
        if credentials.is_some() {
            tracing::info!("Using credential helper for {}", shown_url);
        }

        let mut cmd = self.clone_command(url, branch, credentials, &dest);
        let output = run_with_timeout(&mut cmd, self.timeout).map_err(|source| Error::Spawn {
            program: self.tool.to_string(),
            source,
        })?;

        let Some(output) = output else {
            tracing::error!("Clone of {} timed out", shown_url);
            return Err(Error::CloneTimeout {
                url: shown_url,
                timeout: self.timeout,
            });
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = redact(stderr.trim(), &secrets);
            tracing::error!("Git command failed: {}", message);
            return Err(Error::Clone {
                url: shown_url,
                message,
            });
        }

        tracing::info!(path = %dest.display(), "Clone successful");
        Ok(dest)
    }

    /// Build the clone invocation without running it.
    pub fn clone_command(
        &self,
        url: &str,
        branch: &str,
        credentials: Option<&Credentials>,
        dest: &Path,
    ) -> Command {
        let mut cmd = Command::new(self.tool.program());
        cmd.args(["clone", "--depth", "1", "--branch", branch])
            .arg(url)
            .arg(dest)
            .env("GIT_TERMINAL_PROMPT", "0")
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_ASKPASS", "echo")
            .env("GIT_SSH_COMMAND", "ssh -o BatchMode=yes");
        if let Some(creds) = credentials {
            creds.apply(&mut cmd);
        }
        cmd
    }

    /// Destroy the current snapshot. Safe to call repeatedly.
    ///
    /// The handle is cleared even when removal fails so a stale path never
    /// leaks into the next clone.
    pub fn cleanup(&mut self) {
        let Some(path) = self.snapshot.take() else {
            return;
        };
        tracing::info!(path = %path.display(), "Cleaning up snapshot directory");
        if let Err(e) = self.remover.remove(&path) {
            tracing::error!("Error during cleanup: {}", e);
        }
    }
}

impl RemoteSource for GitClient {
    fn describe(&self) -> String {
        self.tool.to_string()
    }

    fn is_available(&self) -> bool {
        self.is_tool_available()
    }

    fn acquire(
        &mut self,
        url: &str,
        branch: &str,
        credentials: Option<&Credentials>,
    ) -> Result<PathBuf> {
        self.clone_repository(url, branch, credentials)
    }

    fn release(&mut self) {
        self.cleanup();
    }
}

impl Drop for GitClient {
    fn drop(&mut self) {
        self.cleanup();
    }
}
