//! Replication Peer State Machine
//!
//! States of one inbound replication stream:
//! - Offline: configured, not yet contacted
//! - Connecting: transport is (re)establishing the connection
//! - Authenticating: connected, credentials being checked
//! - Syncing: reader attached, initial catch-up in progress
//! - Following: reader attached, streaming live rows
//! - Stopped: stream stopped on request (absorbing)
//! - Errored: stream hit a fatal fault (absorbing)
//!
//! Transitions are driven by transport events. This module only validates
//! them; it never initiates network activity.

use std::fmt;

use serde::{Serialize, Serializer};

/// Opaque handle of a reader owned by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReaderHandle(u64);

impl ReaderHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// State of a replication peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeerState {
    /// Configured but not yet contacted. Initial state.
    Offline,
    /// Connection being established
    Connecting,
    /// Connection up, authentication in progress
    Authenticating,
    /// Reader attached, initial sync in progress
    Syncing,
    /// Reader attached, following the peer's log
    Following,
    /// Stopped on request. No further transitions.
    Stopped,
    /// Fatal fault. No further transitions.
    Errored,
}

impl PeerState {
    /// Every state, in lifecycle order.
    pub const ALL: [PeerState; 7] = [
        PeerState::Offline,
        PeerState::Connecting,
        PeerState::Authenticating,
        PeerState::Syncing,
        PeerState::Following,
        PeerState::Stopped,
        PeerState::Errored,
    ];

    /// External status label.
    ///
    /// The match is exhaustive, so adding a state without a label does not
    /// compile.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Offline => "offline",
            Self::Connecting => "connecting",
            Self::Authenticating => "authenticating",
            Self::Syncing => "syncing",
            Self::Following => "following",
            Self::Stopped => "stopped",
            Self::Errored => "errored",
        }
    }

    /// Whether a reader is attached in this state.
    pub fn has_reader(&self) -> bool {
        matches!(self, Self::Syncing | Self::Following)
    }

    /// Whether the state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Errored)
    }

    /// Whether the stream is live (contacted and not terminal).
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Offline) && !self.is_terminal()
    }

    /// Target state for `event`, or `None` if the event is not valid here.
    pub fn next(&self, event: &PeerEvent) -> Option<PeerState> {
        use PeerEvent::*;
        use PeerState::*;

        match (self, event) {
            (Offline, Connect) => Some(Connecting),
            (Connecting, Established) => Some(Authenticating),
            // Guest sessions skip authentication entirely.
            (Connecting | Authenticating, SyncStarted { .. }) => Some(Syncing),
            (Syncing, SyncComplete) => Some(Following),
            (state, Disconnected { .. }) if state.is_active() => Some(Connecting),
            (state, Stop) if state.is_active() => Some(Stopped),
            (state, Fault { .. }) if state.is_active() => Some(Errored),
            _ => None,
        }
    }
}

impl fmt::Display for PeerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PeerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Transport-originated event for a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// First connection attempt
    Connect,
    /// Connection established, authentication starts
    Established,
    /// Reader attached and initial sync started
    SyncStarted { reader: ReaderHandle },
    /// Initial sync finished, now following
    SyncComplete,
    /// Stream dropped; the transport will reconnect
    Disconnected { message: String },
    /// Stream stopped on request
    Stop,
    /// Unrecoverable fault
    Fault { message: String },
}

impl PeerEvent {
    /// Short name for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Established => "established",
            Self::SyncStarted { .. } => "sync_started",
            Self::SyncComplete => "sync_complete",
            Self::Disconnected { .. } => "disconnected",
            Self::Stop => "stop",
            Self::Fault { .. } => "fault",
        }
    }

    /// Diagnostic message carried by the event, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Disconnected { message } | Self::Fault { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_events() -> Vec<PeerEvent> {
        vec![
            PeerEvent::Connect,
            PeerEvent::Established,
            PeerEvent::SyncStarted {
                reader: ReaderHandle::new(1),
            },
            PeerEvent::SyncComplete,
            PeerEvent::Disconnected {
                message: "eof".to_string(),
            },
            PeerEvent::Stop,
            PeerEvent::Fault {
                message: "boom".to_string(),
            },
        ]
    }

    #[test]
    fn test_labels_total_and_distinct() {
        let labels: HashSet<&str> = PeerState::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), PeerState::ALL.len());

        for label in labels {
            assert!(!label.is_empty());
            assert_eq!(label, label.to_lowercase());
            assert!(label.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_display_matches_label() {
        assert_eq!(PeerState::Following.to_string(), "following");
        assert_eq!(PeerState::Errored.to_string(), "errored");
    }

    #[test]
    fn test_happy_path() {
        let reader = ReaderHandle::new(9);
        let state = PeerState::Offline;
        let state = state.next(&PeerEvent::Connect).unwrap();
        assert_eq!(state, PeerState::Connecting);
        let state = state.next(&PeerEvent::Established).unwrap();
        assert_eq!(state, PeerState::Authenticating);
        let state = state.next(&PeerEvent::SyncStarted { reader }).unwrap();
        assert_eq!(state, PeerState::Syncing);
        let state = state.next(&PeerEvent::SyncComplete).unwrap();
        assert_eq!(state, PeerState::Following);
    }

    #[test]
    fn test_guest_skips_authentication() {
        let event = PeerEvent::SyncStarted {
            reader: ReaderHandle::new(1),
        };
        assert_eq!(PeerState::Connecting.next(&event), Some(PeerState::Syncing));
    }

    #[test]
    fn test_following_cannot_reauthenticate_without_disconnect() {
        assert_eq!(PeerState::Following.next(&PeerEvent::Established), None);

        let disconnected = PeerEvent::Disconnected {
            message: "reset".to_string(),
        };
        let state = PeerState::Following.next(&disconnected).unwrap();
        assert_eq!(state, PeerState::Connecting);
        assert_eq!(
            state.next(&PeerEvent::Established),
            Some(PeerState::Authenticating)
        );
    }

    #[test]
    fn test_terminal_states_absorb_everything() {
        for state in [PeerState::Stopped, PeerState::Errored] {
            for event in all_events() {
                assert_eq!(state.next(&event), None, "{state} accepted {}", event.name());
            }
        }
    }

    #[test]
    fn test_terminal_reachable_from_active_states_only() {
        let fault = PeerEvent::Fault {
            message: "x".to_string(),
        };
        for state in PeerState::ALL {
            let expected = state.is_active();
            assert_eq!(state.next(&PeerEvent::Stop).is_some(), expected);
            assert_eq!(state.next(&fault).is_some(), expected);
        }
        assert_eq!(PeerState::Offline.next(&PeerEvent::Stop), None);
    }

    #[test]
    fn test_reader_states() {
        let with_reader: Vec<PeerState> = PeerState::ALL
            .into_iter()
            .filter(|s| s.has_reader())
            .collect();
        assert_eq!(with_reader, vec![PeerState::Syncing, PeerState::Following]);
    }

    #[test]
    fn test_event_message() {
        let event = PeerEvent::Fault {
            message: "disk full".to_string(),
        };
        assert_eq!(event.message(), Some("disk full"));
        assert_eq!(PeerEvent::Stop.message(), None);
    }
}
