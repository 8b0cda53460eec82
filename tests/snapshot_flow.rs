mod common;

use common::{session_in, FakeUfw, SNAPSHOT_MESSY};
use std::path::Path;
use tempfile::TempDir;
use ufw_manager::cli::actions;
use ufw_manager::cli::error::CliError;
use ufw_manager::snapshot::{Snapshot, SnapshotError, SnapshotStore};

fn write_snapshot(dir: &Path, name: &str, yaml: &str) -> std::path::PathBuf {
    let rules = dir.join("rules");
    std::fs::create_dir_all(&rules).unwrap();
    let path = rules.join(name);
    std::fs::write(&path, yaml).unwrap();
    path
}

#[tokio::test]
async fn export_captures_numbered_listing() {
    let tmp = TempDir::new().unwrap();
    let mut session = session_in(tmp.path(), FakeUfw::with_fixtures());

    let path = actions::export_snapshot(&mut session).await.unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("ufw_rules_") && name.ends_with(".yaml"));
    let snapshot = Snapshot::from_yaml(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(snapshot.rules.len(), 4);
    assert_eq!(snapshot.rules[3].number, 4);
    assert!(snapshot.rules[0].content.starts_with("22/tcp"));
    assert_eq!(session.executor().commands(), vec!["ufw status numbered"]);
    assert_eq!(session.executor().acquired, 1);
}

#[tokio::test]
async fn import_of_empty_rules_runs_nothing() {
    let tmp = TempDir::new().unwrap();
    let empty = write_snapshot(
        tmp.path(),
        "empty.yaml",
        "export_time: '2024-05-01 12:00:00'\nrules: []\n",
    );
    let absent = write_snapshot(tmp.path(), "absent.yaml", "export_time: '2024-05-01 12:00:00'\n");
    let mut session = session_in(tmp.path(), FakeUfw::with_fixtures());

    for file in [empty, absent] {
        let err = actions::import_snapshot(&mut session, &file, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Snapshot(SnapshotError::NoRules)));
    }
    assert!(session.executor().calls.is_empty());
    assert_eq!(session.executor().acquired, 0);
}

#[tokio::test]
async fn import_replays_recoverable_rules_and_survives_failures() {
    let tmp = TempDir::new().unwrap();
    write_snapshot(tmp.path(), "ufw_rules_20240501_120000.yaml", SNAPSHOT_MESSY);
    let ufw = FakeUfw {
        failing: Some("allow 22".to_string()),
        ..FakeUfw::with_fixtures()
    };
    let mut session = session_in(tmp.path(), ufw);

    // Bare file names resolve inside the rules directory.
    actions::import_snapshot(
        &mut session,
        Path::new("ufw_rules_20240501_120000.yaml"),
        true,
    )
    .await
    .unwrap();

    assert_eq!(
        session.executor().commands(),
        vec![
            "ufw deny 8080",
            "ufw allow 22",
            "ufw deny 8080",
            "ufw reject 443",
        ]
    );
}

#[tokio::test]
async fn organize_dedups_sorts_and_never_touches_firewall() {
    let tmp = TempDir::new().unwrap();
    let source = write_snapshot(tmp.path(), "messy.yaml", SNAPSHOT_MESSY);
    let session = session_in(tmp.path(), FakeUfw::default());

    let first = actions::organize_snapshot(&session, &source).await.unwrap();
    let organized = session.store.load(&first).await.unwrap();

    let contents: Vec<&str> = organized.rules.iter().map(|r| r.content.as_str()).collect();
    assert_eq!(
        contents,
        vec![
            "Anywhere on eth0 ALLOW IN Anywhere",
            "22/tcp ALLOW IN Anywhere",
            "443 REJECT IN Anywhere",
            "8080 DENY IN 10.0.0.0/8",
        ]
    );
    assert_eq!(organized.original_count, Some(5));
    assert_eq!(organized.organized_count, Some(4));
    assert_eq!(organized.export_time, "2024-05-01 12:00:00");

    let again = organized.organized(chrono::Local::now()).unwrap();
    assert_eq!(again.rules, organized.rules);
    assert!(session.executor().calls.is_empty());
}

#[tokio::test]
async fn organize_of_empty_snapshot_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let source = write_snapshot(tmp.path(), "empty.yaml", "rules:\n");
    let session = session_in(tmp.path(), FakeUfw::default());

    let err = actions::organize_snapshot(&session, &source)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Snapshot(SnapshotError::NoRules)));
    assert_eq!(SnapshotStore::new(tmp.path().join("rules")).list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn missing_snapshot_is_reported() {
    let tmp = TempDir::new().unwrap();
    let mut session = session_in(tmp.path(), FakeUfw::default());

    let err = actions::import_snapshot(&mut session, Path::new("nope.yaml"), true)
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Snapshot(SnapshotError::NotFound(_))));
}
