//! End-to-end integration tests for a full update cycle
//!
//! These exercise the complete flow: config file + stored token -> scan
//! across several roots -> shallow clone -> layout resolution -> replace.

use plugsync_core::{
    ArtifactStatus, FileSecretStore, SecretStore, SyncConfig, SyncEngine, SyncOptions,
};
use plugsync_fs::{NativePlatform, Remover};
use plugsync_git::GitClient;
use plugsync_test_utils::git::{RemoteRepo, require_git};
use plugsync_test_utils::logs::capture_logs;
use plugsync_test_utils::plugin::{install_plugin, installed_version};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn client(snapshots: &Path) -> GitClient {
    GitClient::new(None)
        .with_temp_root(snapshots)
        .with_removal_grace(Duration::ZERO)
}

fn engine(config: SyncConfig, snapshots: &Path) -> SyncEngine<GitClient> {
    SyncEngine::new(config, client(snapshots))
        .with_remover(Remover::new(Arc::new(NativePlatform)).with_grace(Duration::ZERO))
}

fn statuses(report: &plugsync_core::BatchReport) -> Vec<(String, ArtifactStatus)> {
    report
        .outcomes
        .iter()
        .map(|o| (o.name.clone(), o.status.clone()))
        .collect()
}

#[test]
fn test_batch_across_roots_with_multi_plugin_repository() {
    require_git();
    let user_root = TempDir::new().unwrap();
    let system_root = TempDir::new().unwrap();
    let snapshots = TempDir::new().unwrap();

    let widgets = install_plugin(user_root.path(), "Acme_Widgets", Some("1.0.0"));
    let gadgets = install_plugin(system_root.path(), "Acme_Gadgets", Some("0.9.0"));
    let tools = install_plugin(system_root.path(), "Acme_Tools", Some("5.0.0"));

    let remote = RemoteRepo::new()
        .plugin("Acme_Widgets", Some("1.1.0"))
        .file("Acme_Widgets/core/engine.py", "ENGINE = 2\n")
        .plugin("acme_gadgets", Some("1.0.0"))
        .file("acme_gadgets/gadgets.py", "g\n")
        .plugin("Acme_Tools", Some("5.0.0"))
        .commit("three plugins");

    let config = SyncConfig {
        prefix: "Acme_".into(),
        repository: remote.url(),
        search_roots: vec![
            user_root.path().to_path_buf(),
            system_root.path().to_path_buf(),
            user_root.path().to_path_buf(),
        ],
        ..SyncConfig::default()
    };

    let mut engine = engine(config, snapshots.path());
    let report = engine.run(&SyncOptions::default()).unwrap();

    assert_eq!(
        statuses(&report),
        vec![
            (
                "Acme_Widgets".to_string(),
                ArtifactStatus::Updated {
                    from: "1.0.0".into(),
                    to: "1.1.0".into()
                }
            ),
            (
                "Acme_Gadgets".to_string(),
                ArtifactStatus::Updated {
                    from: "0.9.0".into(),
                    to: "1.0.0".into()
                }
            ),
            (
                "Acme_Tools".to_string(),
                ArtifactStatus::UpToDate {
                    version: "5.0.0".into()
                }
            ),
        ]
    );
    assert_eq!(
        fs::read_to_string(widgets.join("core/engine.py")).unwrap(),
        "ENGINE = 2\n"
    );
    assert!(gadgets.join("gadgets.py").is_file());
    assert!(tools.join("installed.marker").is_file());
    assert_eq!(fs::read_dir(snapshots.path()).unwrap().count(), 0);
}

#[test]
fn test_second_run_is_idempotent() {
    require_git();
    let root = TempDir::new().unwrap();
    let snapshots = TempDir::new().unwrap();
    install_plugin(root.path(), "Acme_Widgets", Some("1.0.0"));
    let remote = RemoteRepo::new().single(Some("1.1.0")).commit("release");

    let config = SyncConfig {
        prefix: "Acme_".into(),
        repository: remote.url(),
        search_roots: vec![root.path().to_path_buf()],
        ..SyncConfig::default()
    };

    let first = engine(config.clone(), snapshots.path())
        .run(&SyncOptions::default())
        .unwrap();
    assert_eq!(first.updated(), vec!["Acme_Widgets"]);

    let second = engine(config, snapshots.path())
        .run(&SyncOptions::default())
        .unwrap();
    assert!(second.updated().is_empty());
    assert_eq!(second.summary(), "All plugins are up to date");
}

#[test]
fn test_config_file_and_stored_token_flow() {
    require_git();
    let home = TempDir::new().unwrap();
    let root = TempDir::new().unwrap();
    let snapshots = TempDir::new().unwrap();
    let plugin = install_plugin(root.path(), "Acme_Widgets", Some("1.0.0"));
    let remote = RemoteRepo::new().single(Some("1.0.1")).commit("patch");

    let store = FileSecretStore::in_dir(home.path());
    let handle = store.seal("ghp_integration_secret").unwrap();
    let config_path: PathBuf = home.path().join("config.toml");
    SyncConfig {
        prefix: "Acme_".into(),
        repository: remote.url(),
        username: Some("octocat".into()),
        token: Some(handle),
        search_roots: vec![root.path().to_path_buf()],
        ..SyncConfig::default()
    }
    .save(&config_path)
    .unwrap();

    assert!(
        !fs::read_to_string(&config_path)
            .unwrap()
            .contains("ghp_integration_secret")
    );

    let config = SyncConfig::load(&config_path).unwrap();
    let credentials = config.credentials(&store).unwrap();
    assert!(credentials.is_some());

    let (report, logs) = capture_logs(|| {
        engine(config, snapshots.path())
            .with_credentials(credentials)
            .run(&SyncOptions::default())
    });

    let report = report.unwrap();
    assert_eq!(report.updated(), vec!["Acme_Widgets"]);
    assert_eq!(installed_version(&plugin).as_deref(), Some("1.0.1"));
    // file:// is not https, so the token is dropped with a warning
    assert!(logs.contains("ignoring credentials"));
    assert!(!logs.contains("ghp_integration_secret"));

    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("ghp_integration_secret"));
}
