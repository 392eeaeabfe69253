//! Git repository fixtures.
//!
//! Remotes are plain local repositories reached through `file://` URLs, so
//! tests exercise the real `git clone` path without network access.

use crate::plugin::metadata;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Branch every fixture repository commits to.
pub const DEFAULT_BRANCH: &str = "main";

/// Run `git` in `path`, panicking with stderr on failure.
///
/// # Panics
/// Panics if git cannot be spawned or exits non-zero.
pub fn git(path: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(path)
        .output()
        .unwrap_or_else(|e| panic!("failed to run `git {args:?}`: {e}"));
    if !output.status.success() {
        panic!(
            "`git {args:?}` failed in {}:\n{}",
            path.display(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// True when a `git` binary is reachable on `PATH`.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Fail the calling test unless `git` is on `PATH`.
///
/// Tests that clone real repositories call this first so a host without
/// git reports failures instead of passing without checking anything.
///
/// # Panics
/// Panics when git cannot be run.
pub fn require_git() {
    assert!(
        git_available(),
        "this test needs a `git` executable on PATH"
    );
}

/// Initialise a repository whose unborn branch is [`DEFAULT_BRANCH`].
///
/// # Panics
/// Panics if any git operation fails.
pub fn init_repo(path: &Path) {
    git(path, &["init"]);
    git(path, &["config", "user.email", "test@test.com"]);
    git(path, &["config", "user.name", "Test User"]);
    git(path, &["config", "commit.gpgsign", "false"]);
    // Works on old git versions that lack `init -b`
    git(
        path,
        &["symbolic-ref", "HEAD", &format!("refs/heads/{DEFAULT_BRANCH}")],
    );
}

/// Stage everything and commit.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(path: &Path, message: &str) {
    git(path, &["add", "-A"]);
    git(path, &["commit", "--allow-empty", "-m", message]);
}

/// `file://` URL for a local repository.
pub fn file_url(path: &Path) -> String {
    let path = path.to_string_lossy().replace('\\', "/");
    if path.starts_with('/') {
        format!("file://{path}")
    } else {
        format!("file:///{path}")
    }
}

/// A throwaway remote repository.
///
/// # Example
///
/// ```rust,no_run
/// use plugsync_test_utils::git::RemoteRepo;
///
/// let remote = RemoteRepo::new()
///     .plugin("acme_tools", Some("1.2.0"))
///     .file("acme_tools/main.py", "print('hi')")
///     .commit("initial");
/// let url = remote.url();
/// ```
pub struct RemoteRepo {
    temp_dir: TempDir,
}

impl Default for RemoteRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteRepo {
    /// Create an initialised, empty repository.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        init_repo(temp_dir.path());
        Self { temp_dir }
    }

    /// Root of the working tree.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// URL to clone this repository from.
    pub fn url(&self) -> String {
        file_url(self.root())
    }

    /// Single-plugin layout: `metadata.txt` at the repository root.
    pub fn single(self, version: Option<&str>) -> Self {
        self.file("metadata.txt", &metadata("single", version))
    }

    /// Multi-plugin layout: a subdirectory carrying its own `metadata.txt`.
    pub fn plugin(self, name: &str, version: Option<&str>) -> Self {
        let text = metadata(name, version);
        self.file(&format!("{name}/metadata.txt"), &text)
    }

    /// Write a file relative to the repository root.
    pub fn file(self, relative: &str, content: &str) -> Self {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    /// Commit everything written so far.
    pub fn commit(self, message: &str) -> Self {
        commit_all(self.root(), message);
        self
    }

    /// Path of a file inside the working tree.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }
}
