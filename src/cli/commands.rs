//! CLI command implementations
//!
//! Each command loads the configuration, does its work against the library
//! and writes exactly one JSON document to stdout.

use std::path::Path;

use serde_json::{json, Value};

use crate::node::{NodeConfig, NodeRegistry};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::status::{StatusSection, StatusSnapshotBuilder};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if cli.quiet {
        Logger::set_min_severity(Severity::Warn);
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Status {
            config,
            section,
            pretty,
        } => status(&config, section, pretty),
        Command::Validate { config } => validate(&config),
    }
}

fn load_config(config_path: &Path) -> CliResult<NodeConfig> {
    let config = NodeConfig::load(config_path)?;
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("node_id", &config.node_id.to_string()),
            ("path", &config_path.display().to_string()),
            ("peers", &config.peers.len().to_string()),
        ],
    );
    Ok(config)
}

/// Print the status snapshot, or one section of it.
pub fn status(config_path: &Path, section: Option<StatusSection>, pretty: bool) -> CliResult<()> {
    let value = status_json(config_path, section)?;
    write_json(&value, pretty)
}

/// Bootstrap a registry from the configuration and render its status.
///
/// Peers start `offline`; nothing here talks to the network.
pub fn status_json(config_path: &Path, section: Option<StatusSection>) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let registry = NodeRegistry::from_config(&config)?;

    let snapshot = StatusSnapshotBuilder::new(&registry).build()?;
    let value = match section {
        Some(section) => snapshot.section(section)?,
        None => snapshot.to_value()?,
    };

    registry.shutdown()?;
    Ok(value)
}

/// Check a configuration file.
pub fn validate(config_path: &Path) -> CliResult<()> {
    let value = validate_json(config_path)?;
    write_json(&value, false)
}

/// Validate a configuration file and describe what it configures.
pub fn validate_json(config_path: &Path) -> CliResult<Value> {
    let config = load_config(config_path)?;
    let identity = config
        .to_identity()
        .map_err(|e| CliError::config_error(e.to_string()))?;

    Ok(json!({
        "valid": true,
        "cluster_uuid": identity.cluster_uuid_str(),
        "node_id": identity.node_id(),
        "read_only": identity.is_read_only(),
        "peers": config.peers.iter().map(|peer| peer.id).collect::<Vec<_>>(),
    }))
}
