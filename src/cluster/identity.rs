//! Immutable cluster/node identity

use thiserror::Error;
use uuid::Uuid;

use crate::vclock::NodeId;

/// Result type for identity construction
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// The nil UUID was supplied for a field that must be set
    #[error("{0} uuid must not be nil")]
    NilUuid(&'static str),

    /// Node id 0 is reserved
    #[error("node id 0 is reserved")]
    ReservedNodeId,
}

/// Identity of the local node within its cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterIdentity {
    cluster_uuid: Uuid,
    node_uuid: Uuid,
    node_id: NodeId,
    read_only: bool,
}

impl ClusterIdentity {
    /// Create the identity at bootstrap.
    pub fn new(
        cluster_uuid: Uuid,
        node_uuid: Uuid,
        node_id: NodeId,
        read_only: bool,
    ) -> IdentityResult<Self> {
        if cluster_uuid.is_nil() {
            return Err(IdentityError::NilUuid("cluster"));
        }
        if node_uuid.is_nil() {
            return Err(IdentityError::NilUuid("node"));
        }
        if node_id == 0 {
            return Err(IdentityError::ReservedNodeId);
        }

        Ok(Self {
            cluster_uuid,
            node_uuid,
            node_id,
            read_only,
        })
    }

    pub fn cluster_uuid(&self) -> Uuid {
        self.cluster_uuid
    }

    pub fn node_uuid(&self) -> Uuid {
        self.node_uuid
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Canonical 36-character hyphenated cluster UUID.
    pub fn cluster_uuid_str(&self) -> String {
        self.cluster_uuid.hyphenated().to_string()
    }

    /// Canonical 36-character hyphenated node UUID.
    pub fn node_uuid_str(&self) -> String {
        self.node_uuid.hyphenated().to_string()
    }
}
