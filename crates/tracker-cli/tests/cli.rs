//! Integration tests for the tracker CLI library.

use std::fs;

use chrono::NaiveDate;
use tracker_cli::config::TrackerConfig;
use tracker_cli::design::{
    load_design, open_session, resolve_focus, seal_design, write_design,
};
use tracker_cli::render::{collect_rows, outline_table, render_text};
use tracker_integrity::{IntegrityCodec, IntegrityStatus};
use tracker_model::HierarchySource;

const DESIGN: &str = r#"{
    "root": "main",
    "circuits": [
        {
            "name": "main",
            "tracking": { "owner": "alice" },
            "components": [
                { "factory": "Pin", "x": 40, "y": 10, "label": "cin",
                  "tracking": { "owner": "bob" } },
                { "subcircuit": "adder", "x": 0, "y": 0, "label": "lsb" },
                { "factory": "AND Gate", "x": 20, "y": 0 }
            ]
        },
        {
            "name": "adder",
            "components": [
                { "factory": "XOR Gate", "x": 10, "y": 20,
                  "tracking": { "owner": "alice", "integrity": "00" } }
            ]
        }
    ]
}"#;

fn write_fixture(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("design.json");
    fs::write(&path, DESIGN).unwrap();
    path
}

fn selected(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn test_plain_outline_with_focus() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);
    let config = TrackerConfig::default();
    let mut session = open_session(&path, &config, Some(&selected(&["alice"]))).unwrap();
    session.expand_to_depth(None).unwrap();

    let root = session.engine().tree().root_state().unwrap();
    let focus = resolve_focus(session.source(), root, "lsb").unwrap();
    session.set_current_view(Some(focus));

    let text = render_text(&collect_rows(&session));
    insta::assert_snapshot!(text, @r"
    main (alice)
      > adder - lsb
        XOR Gate (alice) !integrity
      AND Gate
      Pin - cin (bob) !owner
    ");
}

#[test]
fn test_depth_limits_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);
    let mut session = open_session(&path, &TrackerConfig::default(), None).unwrap();
    session.expand_to_depth(Some(1)).unwrap();

    let rows = collect_rows(&session);
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|row| row.depth <= 1));

    let table = outline_table(&rows).to_string();
    assert!(table.contains("adder - lsb"));
    assert!(table.contains("Integrity"));
}

#[test]
fn test_resolve_focus() {
    let dir = tempfile::tempdir().unwrap();
    let (design, root) = load_design(&write_fixture(&dir)).unwrap();

    assert_eq!(resolve_focus(&design, root, ""), Some(root));
    let by_label = resolve_focus(&design, root, "LSB").unwrap();
    let by_name = resolve_focus(&design, root, "/adder/").unwrap();
    assert_eq!(by_label, by_name);
    assert_eq!(design.parent(by_label), Some(root));
    assert!(resolve_focus(&design, root, "lsb/missing").is_none());
}

#[test]
fn test_seal_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir);
    let config = TrackerConfig::default();
    let codec = IntegrityCodec::new(&config.integrity).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 5, 6)
        .unwrap()
        .and_hms_opt(7, 8, 9)
        .unwrap();

    let (mut design, root) = load_design(&path).unwrap();
    let summary = seal_design(&mut design, &codec, "Zoë Q", "2.0", date).unwrap();
    // Two circuits and four components; the XOR gate was already sealed.
    assert_eq!(summary.sealed, 5);
    assert_eq!(summary.skipped, 1);

    let output = dir.path().join("sealed.json");
    write_design(&design, root, &output).unwrap();

    let mut session = open_session(&output, &config, Some(&selected(&["alice", "bob", "zoe_q"])))
        .unwrap();
    session.expand_to_depth(None).unwrap();
    let rows = collect_rows(&session);
    let statuses: Vec<_> = rows.iter().map(|row| row.validity.integrity).collect();
    assert_eq!(
        statuses
            .iter()
            .filter(|status| **status == IntegrityStatus::Valid)
            .count(),
        4
    );
    let xor = rows.iter().find(|row| row.name == "XOR Gate").unwrap();
    assert_eq!(xor.validity.integrity, IntegrityStatus::Invalid);

    // Existing owners are kept; empty ones get the normalized author.
    let gate = rows.iter().find(|row| row.name == "AND Gate").unwrap();
    assert_eq!(gate.owner.as_deref(), Some("zoe_q"));
    let pin = rows.iter().find(|row| row.name == "Pin - cin").unwrap();
    assert_eq!(pin.owner.as_deref(), Some("bob"));
}

#[test]
fn test_seal_rejects_blank_author() {
    let dir = tempfile::tempdir().unwrap();
    let (mut design, _) = load_design(&write_fixture(&dir)).unwrap();
    let codec = IntegrityCodec::new(&TrackerConfig::default().integrity).unwrap();
    let date = NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    assert!(seal_design(&mut design, &codec, "  ", "1.0", date).is_err());
}

#[test]
fn test_config_file_selection_applies() {
    let dir = tempfile::tempdir().unwrap();
    let design = write_fixture(&dir);
    let config_path = dir.path().join("tracker.toml");
    fs::write(&config_path, "[authors]\nselected = [\"bob\"]\n").unwrap();

    let config = TrackerConfig::load(&config_path).unwrap();
    let session = open_session(&design, &config, None).unwrap();
    let rows = collect_rows(&session);
    let root = &rows[0];
    assert_eq!(root.owner.as_deref(), Some("alice"));
    assert!(!root.validity.owner_valid);
}

#[test]
fn test_unavailable_algorithm_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    let design = write_fixture(&dir);
    let config = TrackerConfig::from_toml("[integrity]\nalgorithm = \"sha1\"").unwrap();
    let error = open_session(&design, &config, None).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("integrity codec"));
    assert!(message.contains("Integrity checking is disabled"));
    assert!(message.contains("sha1"));
}

#[test]
fn test_config_rejects_date_format_override() {
    let result = TrackerConfig::from_toml("[integrity]\ndate_format = \"%Y-%m-%d %z\"");
    assert!(result.is_err());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(TrackerConfig::load(&dir.path().join("absent.toml")).is_err());
    assert_eq!(
        TrackerConfig::load_or_default(None).unwrap(),
        TrackerConfig::default()
    );
}
