//! Node configuration file
//!
//! A single JSON object:
//!
//! ```json
//! {
//!   "cluster_uuid": "6f1c0c4e-93a1-4d52-9a4c-1d6b1c0a7e11",
//!   "node_uuid": "0b4b8a4e-2a55-4b6f-8d0c-7b0c8e1f7a22",
//!   "node_id": 1,
//!   "read_only": false,
//!   "peers": [{"id": 2, "source": "replicator@10.0.0.2:3301"}],
//!   "vclock": {"1": 120, "2": 87}
//! }
//! ```
//!
//! `node_uuid` is generated when absent. `read_only`, `peers` and `vclock`
//! are optional.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cluster::{ClusterIdentity, IdentityResult};
use crate::vclock::{Lsn, NodeId};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// One configured replication source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    /// Numeric id of the peer node
    pub id: NodeId,
    /// Transport address, opaque to this crate
    pub source: String,
}

/// Node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    pub cluster_uuid: Uuid,

    #[serde(default)]
    pub node_uuid: Option<Uuid>,

    pub node_id: NodeId,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default)]
    pub peers: Vec<PeerConfig>,

    /// Recovered vector clock to seed the registry with
    #[serde(default)]
    pub vclock: BTreeMap<NodeId, Lsn>,
}

impl NodeConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: NodeConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// - node id non-zero, UUIDs not nil
    /// - peer ids unique and different from the local id
    /// - peer sources non-empty
    pub fn validate(&self) -> ConfigResult<()> {
        if self.node_id == 0 {
            return Err(ConfigError::Invalid("node_id must be > 0".to_string()));
        }
        if self.cluster_uuid.is_nil() {
            return Err(ConfigError::Invalid(
                "cluster_uuid must not be nil".to_string(),
            ));
        }
        if self.node_uuid.is_some_and(|uuid| uuid.is_nil()) {
            return Err(ConfigError::Invalid("node_uuid must not be nil".to_string()));
        }

        let mut seen = HashSet::new();
        for peer in &self.peers {
            if peer.id == 0 {
                return Err(ConfigError::Invalid("peer id must be > 0".to_string()));
            }
            if peer.id == self.node_id {
                return Err(ConfigError::Invalid(format!(
                    "peer {} is the local node",
                    peer.id
                )));
            }
            if !seen.insert(peer.id) {
                return Err(ConfigError::Invalid(format!(
                    "peer {} is configured more than once",
                    peer.id
                )));
            }
            if peer.source.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "peer {} has an empty source",
                    peer.id
                )));
            }
        }

        Ok(())
    }

    /// Build the node identity, generating a node UUID if none is configured.
    pub fn to_identity(&self) -> IdentityResult<ClusterIdentity> {
        let node_uuid = self.node_uuid.unwrap_or_else(Uuid::new_v4);
        ClusterIdentity::new(self.cluster_uuid, node_uuid, self.node_id, self.read_only)
    }
}
