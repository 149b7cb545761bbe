//! Observability events
//!
//! Every log line names one typed event. Event strings are stable so that
//! operators can grep and alert on them.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file loaded and validated
    ConfigLoaded,
    /// Node registry bootstrapped, identity known
    BootComplete,
    /// Shutdown requested; mutations are rejected from here on
    ShutdownStart,
    /// Shutdown complete
    ShutdownComplete,
    /// Overall node status changed
    NodeStatusChanged,

    // Topology
    /// Peer added to the topology
    PeerAdded,
    /// Peer removed from the topology
    PeerRemoved,

    // Replication
    /// Peer state machine moved to a new state
    PeerTransition,
    /// Transport requested a transition the state machine does not allow
    PeerTransitionRejected,
    /// Peer stream entered the errored state
    PeerFault,
    /// Vector clock update would have moved an entry backwards
    VclockRegression,

    // Status queries
    /// Status snapshot could not be built
    StatusFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::BootComplete => "BOOT_COMPLETE",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::NodeStatusChanged => "NODE_STATUS_CHANGED",

            Event::PeerAdded => "PEER_ADDED",
            Event::PeerRemoved => "PEER_REMOVED",

            Event::PeerTransition => "PEER_TRANSITION",
            Event::PeerTransitionRejected => "PEER_TRANSITION_REJECTED",
            Event::PeerFault => "PEER_FAULT",
            Event::VclockRegression => "VCLOCK_REGRESSION",

            Event::StatusFailed => "STATUS_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StatusFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
