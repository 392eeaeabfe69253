//! Batch results

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// What happened to one installed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactStatus {
    Updated { from: String, to: String },
    UpToDate { version: String },
    /// Dry run found a different remote version
    UpdateAvailable { from: String, to: String },
    Skipped { reason: String },
    Failed { reason: String },
}

impl ArtifactStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// One line of a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactOutcome {
    pub name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ArtifactStatus,
    /// Where the previous tree went when it could not be deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renamed_aside: Option<PathBuf>,
}

/// Result of one sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub prefix: String,
    /// Repository URL with any userinfo masked
    pub repository: String,
    pub branch: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub outcomes: Vec<ArtifactOutcome>,
}

impl BatchReport {
    pub fn new(prefix: &str, repository: &str, branch: &str, dry_run: bool) -> Self {
        Self {
            prefix: prefix.to_string(),
            repository: plugsync_git::redact(repository, &[]),
            branch: branch.to_string(),
            dry_run,
            started_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: ArtifactOutcome) {
        self.outcomes.push(outcome);
    }

    /// Names of plugins with the given kind of status.
    fn names_where(&self, pred: impl Fn(&ArtifactStatus) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| pred(&o.status))
            .map(|o| o.name.as_str())
            .collect()
    }

    pub fn updated(&self) -> Vec<&str> {
        self.names_where(|s| matches!(s, ArtifactStatus::Updated { .. }))
    }

    pub fn available(&self) -> Vec<&str> {
        self.names_where(|s| matches!(s, ArtifactStatus::UpdateAvailable { .. }))
    }

    pub fn failed(&self) -> Vec<&ArtifactOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_failure())
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(|o| o.status.is_failure())
    }

    /// One-line summary for the user.
    pub fn summary(&self) -> String {
        if self.outcomes.is_empty() {
            return format!("No plugins found with prefix '{}'", self.prefix);
        }
        let changed = if self.dry_run {
            self.available()
        } else {
            self.updated()
        };
        match (changed.len(), self.dry_run) {
            (0, _) if self.has_failures() => {
                format!("{} plugins could not be updated", self.failed().len())
            }
            (0, _) => "All plugins are up to date".to_string(),
            (n, true) => format!("Updates available for {} plugins: {}", n, changed.join(", ")),
            (n, false) => format!("Updated {} plugins: {}", n, changed.join(", ")),
        }
    }
}
