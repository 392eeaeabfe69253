//! Path canonicalization for deduplicating plugin locations
//!
//! The same plugin may be reachable through several configured roots
//! (a symlinked directory, a trailing slash, `..` segments). Everything
//! that compares plugin locations goes through [`canonicalize`].

use std::path::{Component, Path, PathBuf};

/// Resolve a path to a canonical form suitable for identity comparison.
///
/// Uses the filesystem (following symlinks) when the path exists and falls
/// back to a purely lexical normalization otherwise. On Windows the
/// result avoids `\\?\` verbatim prefixes so it stays readable in logs.
pub fn canonicalize(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    dunce::canonicalize(path).unwrap_or_else(|_| normalize_lexical(path))
}

/// Collapse `.` and `..` segments without touching the filesystem.
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_lexical_collapses_segments() {
        let path = Path::new("/plugins/./Acme_Widgets/../Acme_Gadgets");
        assert_eq!(normalize_lexical(path), PathBuf::from("/plugins/Acme_Gadgets"));
    }

    #[test]
    fn test_normalize_lexical_keeps_leading_parent() {
        assert_eq!(normalize_lexical(Path::new("../a/b/..")), PathBuf::from("../a"));
    }

    #[test]
    fn test_normalize_lexical_empty_becomes_current_dir() {
        assert_eq!(normalize_lexical(Path::new("a/..")), PathBuf::from("."));
    }

    #[test]
    fn test_canonicalize_existing_dir_matches_alias() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("inner")).unwrap();

        let direct = canonicalize(temp.path().join("inner"));
        let aliased = canonicalize(temp.path().join("inner").join("..").join("inner"));
        assert_eq!(direct, aliased);
    }

    #[test]
    fn test_canonicalize_missing_path_falls_back() {
        let path = Path::new("/definitely/not/here/../there");
        assert_eq!(canonicalize(path), PathBuf::from("/definitely/not/there"));
    }
}
