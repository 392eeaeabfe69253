//! Locating the git executable

use crate::process::run_with_timeout;
use plugsync_fs::Platform;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

const TOOL_NAME: &str = "git";
const VERSION_TIMEOUT: Duration = Duration::from_secs(15);

/// Where git will be run from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolPath {
    /// A concrete executable found on disk
    Located(PathBuf),
    /// Nothing found; rely on `PATH` to resolve `git`
    SearchPath,
}

impl ToolPath {
    /// Resolve the git executable once.
    ///
    /// An explicit override wins when it exists, then the platform's
    /// well-known install locations in order, then `PATH`.
    pub fn locate(override_path: Option<&Path>, platform: &dyn Platform) -> Self {
        tracing::info!("Searching for Git executable");

        if let Some(path) = override_path {
            if path.is_file() {
                tracing::info!(path = %path.display(), "Using configured Git path");
                return Self::Located(path.to_path_buf());
            }
            tracing::warn!(path = %path.display(), "Configured Git path does not exist");
        }

        match platform.locate_executable(TOOL_NAME) {
            Some(path) => {
                tracing::info!(path = %path.display(), "Found Git");
                Self::Located(path)
            }
            None => {
                tracing::warn!("Git not found in common locations, defaulting to 'git'");
                Self::SearchPath
            }
        }
    }

    /// Program name or path to hand to [`Command::new`].
    pub fn program(&self) -> &OsStr {
        match self {
            Self::Located(path) => path.as_os_str(),
            Self::SearchPath => OsStr::new(TOOL_NAME),
        }
    }

    /// Output of `git --version`, if git runs at all.
    pub fn version(&self) -> Option<String> {
        let mut cmd = Command::new(self.program());
        cmd.arg("--version");
        match run_with_timeout(&mut cmd, VERSION_TIMEOUT) {
            Ok(Some(output)) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            }
            Ok(Some(output)) => {
                tracing::error!(
                    "Git check failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                None
            }
            Ok(None) => {
                tracing::error!("Git check timed out");
                None
            }
            Err(e) => {
                tracing::error!("Git check failed: {}", e);
                None
            }
        }
    }

    /// True when the located executable exists or `git --version` succeeds.
    ///
    /// Never fails; problems are logged and reported as `false`.
    pub fn is_available(&self) -> bool {
        if let Self::Located(path) = self {
            if path.exists() {
                return true;
            }
        }
        match self.version() {
            Some(version) => {
                tracing::info!("Git is installed: {}", version);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for ToolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Located(path) => write!(f, "{}", path.display()),
            Self::SearchPath => write!(f, "{} (from PATH)", TOOL_NAME),
        }
    }
}
