#![cfg(unix)]

mod common;

use common::UpgradeFixture;
use incre_upgrade::{FailurePolicy, UpgradeEngine, UpgradeError, UpgradeRequest};

const MANIFEST: &str = r#"{
    "V1.0.0_20211111": {"standard": {"sql": "V1.0.0_20211111_standard.sql", "sh": "V1.0.0_20211111_standard.sh"}},
    "V1.0.0_20211112": {"standard": {"sql": "V1.0.0_20211112_standard.sql"}, "enterprise": {"sh": "enterprise.sh"}},
    "V1.0.1_20220101": {"standard": {"sh": "broken.sh"}},
    "V1.0.1_20220102": {"standard": {"sh": "V1.0.1_20220102_standard.sh", "py": "unsupported.py"}},
    "V1.1.0_20220301": {"standard": {"sh": "future.sh"}}
}"#;

fn fixture() -> UpgradeFixture {
    let fixture = UpgradeFixture::new(MANIFEST);
    fixture.add_sql_script("V1.0.0_20211111_standard.sql", "CREATE TABLE t(id INTEGER);\n");
    fixture.add_shell_script("V1.0.0_20211111_standard.sh", 0);
    fixture.add_sql_script("V1.0.0_20211112_standard.sql", "ALTER TABLE t ADD COLUMN name TEXT;\n");
    fixture.add_shell_script("enterprise.sh", 0);
    fixture.add_shell_script("broken.sh", 2);
    fixture.add_shell_script("V1.0.1_20220102_standard.sh", 0);
    fixture.add_shell_script("future.sh", 0);
    fixture
}

fn sql_line(fixture: &UpgradeFixture, name: &str) -> String {
    format!(
        "sql {} .read \"{}\"",
        fixture.target().display(),
        fixture.script_root().join(name).display()
    )
}

#[tokio::test]
async fn test_upgrade_runs_range_in_order_and_survives_failures() {
    let fixture = fixture();
    let engine = UpgradeEngine::new(fixture.config());
    let request = UpgradeRequest::new(
        "standard",
        "V1.0.0_20211111",
        "V1.0.1_20220102",
        fixture.target(),
    );

    let report = engine.run(&request).await.expect("Manifest should load");

    assert!(report.success());
    assert_eq!(
        fixture.log(),
        vec![
            "sh V1.0.0_20211111_standard.sh".to_string(),
            sql_line(&fixture, "V1.0.0_20211111_standard.sql"),
            sql_line(&fixture, "V1.0.0_20211112_standard.sql"),
            "sh broken.sh".to_string(),
            "sh V1.0.1_20220102_standard.sh".to_string(),
        ]
    );

    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 2);
    assert_eq!(failed[0].version, "V1.0.1_20220101");
    assert_eq!(failed[0].outcome.exit_code, Some(2));
    assert_eq!(failed[0].outcome.captured_stderr, "broken.sh exited 2\n");
    assert_eq!(failed[1].outcome.script_kind, "py");

    assert_eq!(report.skipped_out_of_range.len(), 1);
    assert_eq!(report.skipped_out_of_range[0].version, "V1.1.0_20220301");
}

#[tokio::test]
async fn test_single_version_upgrade() {
    let fixture = fixture();
    let engine = UpgradeEngine::new(fixture.config());

    let ok = engine
        .incre_upgrade(
            "standard",
            "V1.0.0_20211112",
            "V1.0.0_20211112",
            fixture.target(),
        )
        .await;

    assert!(ok);
    assert_eq!(
        fixture.log(),
        vec![sql_line(&fixture, "V1.0.0_20211112_standard.sql")]
    );
}

#[tokio::test]
async fn test_enterprise_branch_only_runs_its_scripts() {
    let fixture = fixture();
    let engine = UpgradeEngine::new(fixture.config());

    let ok = engine
        .incre_upgrade("enterprise", "V1.0.0_20211111", "V1.1.0_20220301", fixture.target())
        .await;

    assert!(ok);
    assert_eq!(fixture.log(), vec!["sh enterprise.sh".to_string()]);
}

#[tokio::test]
async fn test_missing_manifest_fails_run() {
    let fixture = UpgradeFixture::without_manifest();
    let engine = UpgradeEngine::new(fixture.config());

    let ok = engine
        .incre_upgrade("standard", "V1.0.0", "V9.9.9", fixture.target())
        .await;
    assert!(!ok);
    assert!(fixture.log().is_empty());

    let result = engine
        .run(&UpgradeRequest::new("standard", "V1.0.0", "V9.9.9", fixture.target()))
        .await;
    assert!(matches!(result, Err(UpgradeError::ManifestError(_))));
}

#[tokio::test]
async fn test_strict_policy_stops_at_failed_script() {
    let fixture = fixture();
    let engine = UpgradeEngine::new(fixture.config().with_failure_policy(FailurePolicy::Strict));

    let report = engine
        .run(&UpgradeRequest::new(
            "standard",
            "V1.0.1_20220101",
            "V1.1.0_20220301",
            fixture.target(),
        ))
        .await
        .expect("Manifest should load");

    assert!(report.halted);
    assert!(!report.success());
    assert_eq!(fixture.log(), vec!["sh broken.sh".to_string()]);
}

#[tokio::test]
async fn test_repeated_idempotent_upgrade_reaches_same_state() {
    let fixture = UpgradeFixture::new(r#"{"V1.0.0": {"standard": {"sh": "mark.sh"}}}"#);
    let marker = fixture.upgrade_dir().join("marker");
    fixture.write_executable(
        &fixture.script_root().join("mark.sh"),
        &format!("#!/bin/sh\necho applied > '{}'\n", marker.display()),
    );
    let engine = UpgradeEngine::new(fixture.config());

    let first = engine
        .incre_upgrade("standard", "V1.0.0", "V1.0.0", fixture.target())
        .await;
    let state_after_first = std::fs::read_to_string(&marker).expect("Marker should exist");

    let second = engine
        .incre_upgrade("standard", "V1.0.0", "V1.0.0", fixture.target())
        .await;
    let state_after_second = std::fs::read_to_string(&marker).expect("Marker should exist");

    assert!(first && second);
    assert_eq!(state_after_first, state_after_second);
}
