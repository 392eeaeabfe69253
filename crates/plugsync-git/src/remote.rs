//! Remote repository URL helpers

use std::fmt;
use url::Url;

const HOSTING_DOMAIN: &str = "github.com";

/// Owner and repository name of a hosted remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    pub owner: String,
    pub name: String,
}

impl RemoteIdentity {
    /// Parse a hosted repository URL.
    ///
    /// Supports:
    /// - `https://github.com/owner/repo`
    /// - `https://github.com/owner/repo.git`
    /// - `git@github.com:owner/repo.git`
    ///
    /// Returns `None` for anything else, including local paths and
    /// self-hosted servers.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if let Some(rest) = input.strip_prefix("git@") {
            let (host, path) = rest.split_once(':')?;
            if host != HOSTING_DOMAIN {
                return None;
            }
            return Self::from_path(path);
        }

        let url = Url::parse(input).ok()?;
        let host = url.host_str()?;
        if host != HOSTING_DOMAIN && host != "www.github.com" {
            return None;
        }
        Self::from_path(url.path())
    }

    fn from_path(path: &str) -> Option<Self> {
        let path = path.trim_matches('/');
        let path = path.strip_suffix(".git").unwrap_or(path);
        let mut parts = path.split('/');
        let owner = parts.next().filter(|s| !s.is_empty())?;
        let name = parts.next().filter(|s| !s.is_empty())?;
        Some(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RemoteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Whether credentials may be sent over this URL.
pub fn is_secure_transport(url: &str) -> bool {
    Url::parse(url.trim())
        .map(|u| u.scheme() == "https")
        .unwrap_or(false)
}
