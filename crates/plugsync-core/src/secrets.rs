//! Sealing of stored tokens
//!
//! The configuration file only ever holds an opaque handle. The token
//! itself lives in a separate `secrets.toml` that must be readable by its
//! owner alone (0600 on Unix).

use crate::config::SyncConfig;
use crate::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use plugsync_fs::ConfigStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SECRETS_FILE: &str = "secrets.toml";

/// Turns a secret into a storable handle and back.
pub trait SecretStore {
    /// Store `secret` and return the handle to persist in configuration.
    fn seal(&self, secret: &str) -> Result<String>;

    /// Recover the secret for `handle`.
    fn unseal(&self, handle: &str) -> Result<String>;
}

/// Reversible encoding with no protection at all.
///
/// For tests and for hosts that have nowhere safer to put a token.
#[derive(Debug, Default, Clone, Copy)]
pub struct Base64SecretStore;

impl SecretStore for Base64SecretStore {
    fn seal(&self, secret: &str) -> Result<String> {
        Ok(STANDARD.encode(secret))
    }

    fn unseal(&self, handle: &str) -> Result<String> {
        let bytes = STANDARD.decode(handle.trim()).map_err(|e| Error::Secret {
            message: format!("handle is not valid base64: {e}"),
        })?;
        String::from_utf8(bytes).map_err(|_| Error::Secret {
            message: "sealed value is not UTF-8".into(),
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SecretsFile {
    secrets: BTreeMap<String, String>,
}

/// Tokens kept in an owner-only TOML file, addressed by random handles.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in `<dir>/secrets.toml`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SECRETS_FILE))
    }

    /// Store next to the default configuration file.
    pub fn default_location() -> Result<Self> {
        Ok(Self::in_dir(&SyncConfig::default_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop a stored secret. Returns whether it existed.
    pub fn forget(&self, handle: &str) -> Result<bool> {
        let mut file = self.read()?;
        let existed = file.secrets.remove(handle).is_some();
        if existed {
            self.write(&file)?;
            tracing::debug!("Removed stored secret");
        }
        Ok(existed)
    }

    fn read(&self) -> Result<SecretsFile> {
        if !self.path.exists() {
            return Ok(SecretsFile::default());
        }
        self.check_permissions()?;
        Ok(ConfigStore::private().load(&self.path)?)
    }

    fn write(&self, file: &SecretsFile) -> Result<()> {
        ConfigStore::private().save(&self.path, file)?;
        Ok(())
    }

    #[cfg(unix)]
    fn check_permissions(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let mode = std::fs::metadata(&self.path)?.permissions().mode();
        if mode & 0o077 != 0 {
            return Err(Error::InsecureSecrets {
                path: self.path.clone(),
            });
        }
        tracing::debug!(
            path = %self.path.display(),
            mode = %format!("{:o}", mode & 0o777),
            "Secrets file permissions OK"
        );
        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(&self) -> Result<()> {
        Ok(())
    }
}

impl SecretStore for FileSecretStore {
    fn seal(&self, secret: &str) -> Result<String> {
        let mut file = self.read()?;
        let handle = Uuid::new_v4().to_string();
        file.secrets.insert(handle.clone(), secret.to_string());
        self.write(&file)?;
        tracing::info!(path = %self.path.display(), "Stored token");
        Ok(handle)
    }

    fn unseal(&self, handle: &str) -> Result<String> {
        self.read()?
            .secrets
            .remove(handle)
            .ok_or(Error::UnknownSecret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_base64_round_trip() {
        let store = Base64SecretStore;
        let handle = store.seal("ghp_abc").unwrap();
        assert_ne!(handle, "ghp_abc");
        assert_eq!(store.unseal(&handle).unwrap(), "ghp_abc");
        assert!(store.unseal("***not base64***").is_err());
    }

    #[test]
    fn test_file_store_keeps_token_out_of_handle() {
        let temp = TempDir::new().unwrap();
        let store = FileSecretStore::in_dir(temp.path());

        let handle = store.seal("ghp_abc").unwrap();

        assert!(!handle.contains("ghp_abc"));
        assert_eq!(store.unseal(&handle).unwrap(), "ghp_abc");
        assert!(matches!(
            store.unseal("missing"),
            Err(Error::UnknownSecret)
        ));
    }

    #[test]
    fn test_file_store_holds_several_tokens() {
        let temp = TempDir::new().unwrap();
        let store = FileSecretStore::in_dir(temp.path());

        let first = store.seal("one").unwrap();
        let second = store.seal("two").unwrap();
        assert!(store.forget(&first).unwrap());
        assert!(!store.forget(&first).unwrap());

        assert!(store.unseal(&first).is_err());
        assert_eq!(store.unseal(&second).unwrap(), "two");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = FileSecretStore::in_dir(temp.path());
        store.seal("ghp_abc").unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_rejects_shared_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let store = FileSecretStore::in_dir(temp.path());
        let handle = store.seal("ghp_abc").unwrap();
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        assert!(matches!(
            store.unseal(&handle),
            Err(Error::InsecureSecrets { .. })
        ));
    }
}
