//! Node registry error types

use thiserror::Error;

use crate::cluster::IdentityError;
use crate::replication::PeerError;
use crate::vclock::{NodeId, VectorClockError};

/// A lock guarding node state was poisoned by a panicking writer.
///
/// This is an internal invariant failure, never a cluster health signal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0} lock poisoned")]
pub struct LockPoisoned(pub &'static str);

/// Node registry errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The registry has been shut down and accepts no more mutations
    #[error("node registry is shut down")]
    ShutDown,

    /// No peer with this id is configured
    #[error("unknown peer {0}")]
    UnknownPeer(NodeId),

    /// A peer with this id is already configured
    #[error("peer {0} is already configured")]
    DuplicatePeer(NodeId),

    /// The local node cannot replicate from itself
    #[error("peer {0} is the local node")]
    LocalPeer(NodeId),

    #[error(transparent)]
    LockPoisoned(#[from] LockPoisoned),

    #[error(transparent)]
    VectorClock(#[from] VectorClockError),

    #[error(transparent)]
    Peer(#[from] PeerError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Result type for node registry operations
pub type NodeResult<T> = Result<T, NodeError>;
