//! Replication Error Types
//!
//! Rejected transitions are non-fatal: the peer state is left unchanged and
//! the caller decides whether to log or escalate.

use thiserror::Error;

use super::state::PeerState;
use crate::vclock::NodeId;

/// Replication peer error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    /// The event is not valid from the peer's current state
    #[error("invalid transition for peer {peer_id}: '{event}' from state '{from}'")]
    InvalidTransition {
        peer_id: NodeId,
        from: PeerState,
        event: &'static str,
    },
}

/// Result type for peer operations
pub type PeerResult<T> = Result<T, PeerError>;
