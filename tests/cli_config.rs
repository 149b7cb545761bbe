//! Configuration and CLI Tests
//!
//! - Configuration files load, validate and bootstrap a registry
//! - CLI commands render the status snapshot from a configuration file
//! - Error codes are stable

use std::io::Write;

use nodestat::cli::{status_json, validate_json, CliErrorCode};
use nodestat::node::{ConfigError, NodeConfig, NodeRegistry};
use nodestat::status::{StatusSection, StatusSnapshotBuilder};
use serde_json::json;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

const CONFIG: &str = r#"{
    "cluster_uuid": "6f1c0c4e-93a1-4d52-9a4c-1d6b1c0a7e11",
    "node_id": 2,
    "read_only": true,
    "peers": [{"id": 1, "source": "replicator@10.0.0.1:3301"}],
    "vclock": {"1": 120, "2": 87}
}"#;

// =============================================================================
// Configuration
// =============================================================================

/// A configuration file bootstraps a registry with its seed clock and peers.
#[test]
fn test_config_bootstraps_registry() {
    let file = write_config(CONFIG);
    let config = NodeConfig::load(file.path()).unwrap();
    let registry = NodeRegistry::from_config(&config).unwrap();

    let snapshot = StatusSnapshotBuilder::new(&registry).build().unwrap();
    assert_eq!(snapshot.node.id, 2);
    assert_eq!(snapshot.node.lsn, 87);
    assert!(snapshot.node.read_only);
    assert_eq!(snapshot.vclock.snapshot_entries(), vec![(1, 120), (2, 87)]);
    assert_eq!(snapshot.replication.records().len(), 1);
}

/// Malformed JSON is a parse error.
#[test]
fn test_malformed_config() {
    let file = write_config("{ not json");
    assert!(matches!(
        NodeConfig::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

// =============================================================================
// CLI
// =============================================================================

/// Full status document from a configuration file.
#[test]
fn test_status_command_document() {
    let file = write_config(CONFIG);
    let value = status_json(file.path(), None).unwrap();

    assert_eq!(value["node"]["readOnly"], true);
    assert_eq!(value["cluster"]["uuid"], "6f1c0c4e-93a1-4d52-9a4c-1d6b1c0a7e11");
    assert_eq!(
        value["replication"],
        json!([{"peer": 1, "source": "replicator@10.0.0.1:3301", "status": "offline"}])
    );
}

/// Selecting a section by name.
#[test]
fn test_status_command_section() {
    let file = write_config(CONFIG);
    let section: StatusSection = "vclock".parse().unwrap();
    let value = status_json(file.path(), Some(section)).unwrap();

    assert_eq!(value, json!({"1": 120, "2": 87}));
    assert!("uptime".parse::<StatusSection>().is_ok());
    assert!("peers".parse::<StatusSection>().is_err());
}

/// Vector clock keys come out in numeric order, not string order.
#[test]
fn test_status_command_vclock_numeric_order() {
    let file = write_config(
        r#"{"cluster_uuid": "6f1c0c4e-93a1-4d52-9a4c-1d6b1c0a7e11", "node_id": 1,
            "vclock": {"1": 5, "2": 6, "10": 7}}"#,
    );

    let section = status_json(file.path(), Some(StatusSection::Vclock)).unwrap();
    let keys: Vec<&String> = section.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["1", "2", "10"]);
    assert_eq!(serde_json::to_string(&section).unwrap(), r#"{"1":5,"2":6,"10":7}"#);

    let full = status_json(file.path(), None).unwrap();
    let rendered = serde_json::to_string(&full["vclock"]).unwrap();
    assert_eq!(rendered, r#"{"1":5,"2":6,"10":7}"#);
}

/// Validate reports what the file configures.
#[test]
fn test_validate_command() {
    let file = write_config(CONFIG);
    let value = validate_json(file.path()).unwrap();

    assert_eq!(value["valid"], true);
    assert_eq!(value["node_id"], 2);
    assert_eq!(value["peers"], json!([1]));
}

/// Missing and invalid files map to the config error code.
#[test]
fn test_config_errors_use_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let err = status_json(&dir.path().join("missing.json"), None).unwrap_err();
    assert_eq!(err.code(), &CliErrorCode::ConfigError);

    let file = write_config(
        r#"{"cluster_uuid": "6f1c0c4e-93a1-4d52-9a4c-1d6b1c0a7e11", "node_id": 1,
            "peers": [{"id": 1, "source": "self"}]}"#,
    );
    let err = validate_json(file.path()).unwrap_err();
    assert_eq!(err.code_str(), "NODESTAT_CLI_CONFIG_ERROR");
}
