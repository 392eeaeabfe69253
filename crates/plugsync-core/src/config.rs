//! Sync configuration
//!
//! Loaded from `<config_dir>/plugsync/config.toml` (or any TOML/JSON file),
//! then overridden by `PLUGSYNC_*` environment variables and CLI flags.

use crate::secrets::SecretStore;
use crate::{Error, Result};
use plugsync_fs::ConfigStore;
use plugsync_git::{Credentials, RemoteIdentity};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name under the platform configuration directory.
pub const APP_DIR: &str = "plugsync";
const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_CLONE_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_REMOVAL_GRACE_MS: u64 = 2000;

/// Environment variables that override file values.
pub mod env {
    pub const PREFIX: &str = "PLUGSYNC_PREFIX";
    pub const REPOSITORY: &str = "PLUGSYNC_REPOSITORY";
    pub const BRANCH: &str = "PLUGSYNC_BRANCH";
    pub const USERNAME: &str = "PLUGSYNC_USERNAME";
    pub const GIT_PATH: &str = "PLUGSYNC_GIT_PATH";
    /// Platform path-list syntax (`:` on Unix, `;` on Windows)
    pub const ROOTS: &str = "PLUGSYNC_ROOTS";
}

/// Everything the sync engine needs to run a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Plugin directory name prefix
    pub prefix: String,
    /// Remote repository URL
    pub repository: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Sealed handle from a [`SecretStore`], never the raw token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_path: Option<PathBuf>,
    pub search_roots: Vec<PathBuf>,
    pub clone_timeout_secs: u64,
    pub removal_grace_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            repository: String::new(),
            branch: DEFAULT_BRANCH.to_string(),
            username: None,
            token: None,
            git_path: None,
            search_roots: Vec::new(),
            clone_timeout_secs: DEFAULT_CLONE_TIMEOUT_SECS,
            removal_grace_ms: DEFAULT_REMOVAL_GRACE_MS,
        }
    }
}

impl SyncConfig {
    /// `<config_dir>/plugsync`
    pub fn default_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR))
            .ok_or(Error::NoConfigDir)
    }

    /// `<config_dir>/plugsync/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::default_dir()?.join(CONFIG_FILE))
    }

    /// Load from `path`; the format follows the extension.
    ///
    /// # Errors
    ///
    /// [`Error::ConfigNotFound`] when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let config = ConfigStore::new().load(path)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Like [`load`](Self::load), but a missing file yields defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound { .. }) => {
                tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        ConfigStore::new().save(path, self)?;
        tracing::info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(prefix) = get(env::PREFIX) {
            self.prefix = prefix;
        }
        if let Some(repository) = get(env::REPOSITORY) {
            self.repository = repository;
        }
        if let Some(branch) = get(env::BRANCH) {
            self.branch = branch;
        }
        if let Some(username) = get(env::USERNAME) {
            self.username = Some(username);
        }
        if let Some(git_path) = get(env::GIT_PATH) {
            self.git_path = Some(PathBuf::from(git_path));
        }
        if let Some(roots) = get(env::ROOTS) {
            self.search_roots = std::env::split_paths(&roots).collect();
        }
    }

    /// Check that a batch can run with these settings.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| {
            Err(Error::InvalidConfig {
                message: message.to_string(),
            })
        };
        if self.prefix.trim().is_empty() {
            return invalid("no organization prefix set");
        }
        if self.repository.trim().is_empty() {
            return invalid("no repository set");
        }
        if self.branch.trim().is_empty() {
            return invalid("branch must not be empty");
        }
        if self.search_roots.is_empty() {
            return invalid("no plugin directories configured");
        }
        Ok(())
    }

    pub fn clone_timeout(&self) -> Duration {
        Duration::from_secs(self.clone_timeout_secs)
    }

    pub fn removal_grace(&self) -> Duration {
        Duration::from_millis(self.removal_grace_ms)
    }

    /// Owner and name of the repository when it is a recognised hosted URL.
    pub fn remote_identity(&self) -> Option<RemoteIdentity> {
        RemoteIdentity::parse(&self.repository)
    }

    /// Build clone credentials by unsealing the stored token.
    ///
    /// Returns `None` unless both a username and a token handle are set.
    pub fn credentials(&self, store: &dyn SecretStore) -> Result<Option<Credentials>> {
        match (&self.username, &self.token) {
            (Some(username), Some(handle)) => {
                let token = store.unseal(handle)?;
                Ok(Credentials::new(username.as_str(), token))
            }
            (Some(_), None) => {
                tracing::warn!("Username configured without a token, cloning anonymously");
                Ok(None)
            }
            (None, Some(_)) => {
                tracing::warn!("Token configured without a username, cloning anonymously");
                Ok(None)
            }
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::Base64SecretStore;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn valid() -> SyncConfig {
        SyncConfig {
            prefix: "Acme_".into(),
            repository: "https://github.com/acme/plugins".into(),
            search_roots: vec![PathBuf::from("/plugins")],
            ..SyncConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.branch, "main");
        assert_eq!(config.clone_timeout(), Duration::from_secs(300));
        assert_eq!(config.removal_grace(), Duration::from_millis(2000));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "prefix = \"Acme_\"\nrepository = \"https://github.com/acme/plugins\"\n",
        )
        .unwrap();

        let config = SyncConfig::load(&path).unwrap();
        assert_eq!(config.prefix, "Acme_");
        assert_eq!(config.branch, "main");
        assert_eq!(config.clone_timeout_secs, 300);
        assert!(config.search_roots.is_empty());
    }

    #[test]
    fn test_save_and_load_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let config = SyncConfig {
            username: Some("octocat".into()),
            token: Some("handle-1".into()),
            ..valid()
        };

        config.save(&path).unwrap();
        assert_eq!(SyncConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_json_config_supported() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        valid().save(&path).unwrap();
        assert_eq!(SyncConfig::load(&path).unwrap(), valid());
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");

        assert!(matches!(
            SyncConfig::load(&path),
            Err(Error::ConfigNotFound { .. })
        ));
        assert_eq!(
            SyncConfig::load_or_default(&path).unwrap(),
            SyncConfig::default()
        );
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, String> = HashMap::from([
            (env::PREFIX, "Env_".to_string()),
            (env::BRANCH, "release".to_string()),
            (env::USERNAME, "  ".to_string()),
            (
                env::ROOTS,
                std::env::join_paths(["/a", "/b"])
                    .unwrap()
                    .to_string_lossy()
                    .into_owned(),
            ),
        ]);
        let mut config = valid();
        config.apply_env_from(|k| vars.get(k).cloned());

        assert_eq!(config.prefix, "Env_");
        assert_eq!(config.branch, "release");
        assert_eq!(config.username, None);
        assert_eq!(
            config.search_roots,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert_eq!(config.repository, valid().repository);
    }

    #[test]
    fn test_validate() {
        assert!(valid().validate().is_ok());
        assert!(
            SyncConfig {
                prefix: " ".into(),
                ..valid()
            }
            .validate()
            .is_err()
        );
        assert!(
            SyncConfig {
                repository: String::new(),
                ..valid()
            }
            .validate()
            .is_err()
        );
        assert!(
            SyncConfig {
                search_roots: vec![],
                ..valid()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_credentials_need_both_parts() {
        let store = Base64SecretStore;
        let handle = store.seal("ghp_secret").unwrap();

        let only_user = SyncConfig {
            username: Some("octocat".into()),
            ..valid()
        };
        assert!(only_user.credentials(&store).unwrap().is_none());

        let both = SyncConfig {
            username: Some("octocat".into()),
            token: Some(handle),
            ..valid()
        };
        let creds = both.credentials(&store).unwrap().unwrap();
        assert_eq!(creds.username(), "octocat");
        assert_eq!(creds.token(), "ghp_secret");
    }
}
