//! CLI argument definitions using clap
//!
//! Commands:
//! - nodestat status --config <path> [--section <name>] [--pretty]
//! - nodestat validate --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::status::StatusSection;

/// nodestat - replication status of a cluster node
#[derive(Parser, Debug)]
#[command(name = "nodestat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only log warnings and errors to stderr
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the node status snapshot as JSON
    Status {
        /// Path to node configuration file
        #[arg(long, default_value = "./nodestat.json")]
        config: PathBuf,

        /// Print a single section (version, node, vclock, replication,
        /// status, uptime, pid, cluster)
        #[arg(long)]
        section: Option<StatusSection>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check a node configuration file and exit
    Validate {
        /// Path to node configuration file
        #[arg(long, default_value = "./nodestat.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_with_section() {
        let cli = Cli::try_parse_from([
            "nodestat", "status", "--config", "n.json", "--section", "vclock", "--pretty",
        ])
        .unwrap();

        match cli.command {
            Command::Status {
                config,
                section,
                pretty,
            } => {
                assert_eq!(config, PathBuf::from("n.json"));
                assert_eq!(section, Some(StatusSection::Vclock));
                assert!(pretty);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(!cli.quiet);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = Cli::try_parse_from(["nodestat", "status", "--section", "peers"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_defaults() {
        let cli = Cli::try_parse_from(["nodestat", "--quiet", "validate"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Command::Validate { config } if config == PathBuf::from("./nodestat.json")
        ));
    }
}
