//! Vector clock error types

use thiserror::Error;

use super::clock::{Lsn, NodeId};

/// Result type for vector clock updates
pub type VectorClockResult<T> = Result<T, VectorClockError>;

/// Errors raised by vector clock updates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VectorClockError {
    /// An update would move an entry backwards.
    ///
    /// Upstream replication never does this legitimately. Seeing it means a
    /// duplicate or out-of-order delivery; the stored value is left untouched.
    #[error("vclock regression for node {node_id}: stored lsn {current}, attempted {attempted}")]
    Regression {
        node_id: NodeId,
        current: Lsn,
        attempted: Lsn,
    },
}

impl VectorClockError {
    /// Node whose entry was involved.
    pub fn node_id(&self) -> NodeId {
        match self {
            Self::Regression { node_id, .. } => *node_id,
        }
    }
}
