//! Platform capabilities: where tools live and how to force a delete
//!
//! Everything OS-specific that the update flow needs sits behind
//! [`Platform`], so the removal and tool-location logic can be exercised
//! in tests with a scripted implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// OS-specific operations used by the update flow.
pub trait Platform: std::fmt::Debug + Send + Sync {
    /// Well-known install locations for an executable, in search order.
    fn well_known_locations(&self, name: &str) -> Vec<PathBuf>;

    /// First well-known location that exists on disk.
    fn locate_executable(&self, name: &str) -> Option<PathBuf> {
        self.well_known_locations(name).into_iter().find(|p| {
            tracing::debug!(candidate = %p.display(), "Probing for {}", name);
            p.is_file()
        })
    }

    /// Ordinary recursive delete.
    fn remove_tree(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }

    /// Last-resort delete used after an ordinary delete hit locked files.
    fn force_delete(&self, path: &Path) -> io::Result<()>;
}

/// The platform the process is running on.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativePlatform;

#[cfg(windows)]
impl Platform for NativePlatform {
    fn well_known_locations(&self, name: &str) -> Vec<PathBuf> {
        let exe = format!("{name}.exe");
        let mut locations: Vec<PathBuf> = [
            r"C:\Program Files\Git\bin",
            r"C:\Program Files\Git\cmd",
            r"C:\Program Files (x86)\Git\bin",
            r"C:\Program Files (x86)\Git\cmd",
        ]
        .iter()
        .map(|dir| Path::new(dir).join(&exe))
        .collect();
        if let Some(home) = dirs::home_dir() {
            locations.push(
                home.join("AppData")
                    .join("Local")
                    .join("Programs")
                    .join("Git")
                    .join("bin")
                    .join(&exe),
            );
        }
        locations
    }

    fn force_delete(&self, path: &Path) -> io::Result<()> {
        clear_readonly(path);
        let output = std::process::Command::new("cmd")
            .args(["/c", "rmdir", "/s", "/q"])
            .arg(path)
            .output()?;
        if !output.status.success() {
            tracing::warn!(
                path = %path.display(),
                "rmdir failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[cfg(not(windows))]
impl Platform for NativePlatform {
    fn well_known_locations(&self, name: &str) -> Vec<PathBuf> {
        ["/usr/bin", "/usr/local/bin", "/opt/homebrew/bin", "/opt/local/bin"]
            .iter()
            .map(|dir| Path::new(dir).join(name))
            .collect()
    }

    fn force_delete(&self, path: &Path) -> io::Result<()> {
        clear_readonly(path);
        fs::remove_dir_all(path)
    }
}

/// Make every entry under `root` writable by its owner.
///
/// Best effort: entries that cannot be changed are skipped.
pub fn clear_readonly(root: &Path) {
    let Ok(meta) = fs::symlink_metadata(root) else {
        return;
    };
    if meta.file_type().is_symlink() {
        return;
    }
    make_writable(root, &meta);
    if meta.is_dir() {
        let Ok(entries) = fs::read_dir(root) else {
            return;
        };
        for entry in entries.flatten() {
            clear_readonly(&entry.path());
        }
    }
}

#[cfg(unix)]
fn make_writable(path: &Path, meta: &fs::Metadata) {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode();
    let wanted = if meta.is_dir() { mode | 0o700 } else { mode | 0o200 };
    if wanted != mode {
        if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(wanted)) {
            tracing::debug!(path = %path.display(), "Could not reset permissions: {}", e);
        }
    }
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn make_writable(path: &Path, meta: &fs::Metadata) {
    let mut perms = meta.permissions();
    if perms.readonly() {
        perms.set_readonly(false);
        if let Err(e) = fs::set_permissions(path, perms) {
            tracing::debug!(path = %path.display(), "Could not clear read-only flag: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_well_known_locations_end_with_tool_name() {
        let locations = NativePlatform.well_known_locations("git");
        assert!(!locations.is_empty());
        for location in locations {
            let file = location.file_name().unwrap().to_string_lossy().to_string();
            assert!(file.starts_with("git"), "unexpected candidate {file}");
        }
    }

    #[test]
    fn test_locate_executable_missing_tool() {
        assert!(
            NativePlatform
                .locate_executable("plugsync-no-such-tool")
                .is_none()
        );
    }

    #[test]
    fn test_force_delete_removes_tree() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("plugin");
        std::fs::create_dir_all(target.join("sub")).unwrap();
        std::fs::write(target.join("sub").join("file.py"), "x").unwrap();

        NativePlatform.force_delete(&target).unwrap();

        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_clear_readonly_restores_owner_write() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let file = temp.path().join("pack.idx");
        std::fs::write(&file, "x").unwrap();
        std::fs::set_permissions(&file, fs::Permissions::from_mode(0o444)).unwrap();

        clear_readonly(temp.path());

        let mode = fs::metadata(&file).unwrap().permissions().mode();
        assert_ne!(mode & 0o200, 0);
    }
}
