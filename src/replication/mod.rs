//! Replication Subsystem
//!
//! Local view of the inbound replication streams a node follows:
//! - A validated per-peer state machine driven by transport events
//! - Reader timestamps from which lag and idle time are derived
//! - The last diagnostic message of each stream
//!
//! Connections are never opened here. The transport reports what happened and
//! this module records it, rejecting events that make no sense for the
//! current state.

mod errors;
mod peer;
mod state;

pub use errors::{PeerError, PeerResult};
pub use peer::{PeerStatus, ReplicationPeer};
pub use state::{PeerEvent, PeerState, ReaderHandle};
