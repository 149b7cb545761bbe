//! Replication peer record
//!
//! One record per inbound stream. Holds the state, the attached reader with
//! its row/ack timestamps, and the last diagnostic message.

use std::time::{Duration, Instant};

use super::errors::{PeerError, PeerResult};
use super::state::{PeerEvent, PeerState, ReaderHandle};
use crate::vclock::NodeId;

/// Reader attached by the transport while syncing or following.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttachedReader {
    handle: ReaderHandle,
    attached_at: Instant,
    last_row_at: Instant,
    last_ack_at: Instant,
}

/// Local view of one inbound replication stream.
#[derive(Debug, Clone)]
pub struct ReplicationPeer {
    peer_id: NodeId,
    source: String,
    state: PeerState,
    reader: Option<AttachedReader>,
    message: Option<String>,
}

/// Consistent copy of a peer's observable fields at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerStatus {
    pub peer_id: NodeId,
    pub source: String,
    pub state: PeerState,
    /// Time since the last acknowledged row; `None` without a reader
    pub lag: Option<Duration>,
    /// Time since any row was received; `None` without a reader
    pub idle: Option<Duration>,
    pub message: Option<String>,
}

impl ReplicationPeer {
    /// Create a configured, not yet contacted peer.
    pub fn new(peer_id: NodeId, source: impl Into<String>) -> Self {
        Self {
            peer_id,
            source: source.into(),
            state: PeerState::Offline,
            reader: None,
            message: None,
        }
    }

    pub fn peer_id(&self) -> NodeId {
        self.peer_id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn state(&self) -> PeerState {
        self.state
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Handle of the attached reader, if any.
    pub fn reader(&self) -> Option<ReaderHandle> {
        self.reader.as_ref().map(|reader| reader.handle)
    }

    /// When the current reader was attached.
    pub fn reader_attached_at(&self) -> Option<Instant> {
        self.reader.as_ref().map(|reader| reader.attached_at)
    }

    /// Apply a transport event observed at `at`.
    ///
    /// Returns the new state. Invalid events fail with
    /// [`PeerError::InvalidTransition`] and change nothing.
    pub fn apply(&mut self, event: PeerEvent, at: Instant) -> PeerResult<PeerState> {
        let next = self
            .state
            .next(&event)
            .ok_or(PeerError::InvalidTransition {
                peer_id: self.peer_id,
                from: self.state,
                event: event.name(),
            })?;

        match event {
            PeerEvent::SyncStarted { reader } => {
                self.reader = Some(AttachedReader {
                    handle: reader,
                    attached_at: at,
                    last_row_at: at,
                    last_ack_at: at,
                });
            }
            PeerEvent::SyncComplete => {
                self.message = None;
            }
            PeerEvent::Disconnected { message } | PeerEvent::Fault { message } => {
                self.reader = None;
                self.message = Some(message);
            }
            PeerEvent::Stop => {
                self.reader = None;
            }
            PeerEvent::Connect | PeerEvent::Established => {}
        }

        self.state = next;
        debug_assert_eq!(self.reader.is_some(), self.state.has_reader());
        Ok(next)
    }

    /// Record that a row arrived at `at`.
    ///
    /// Returns `false` (and does nothing) when no reader is attached, which
    /// happens when a row races a disconnect.
    pub fn record_row_received(&mut self, at: Instant) -> bool {
        match self.reader.as_mut() {
            Some(reader) => {
                reader.last_row_at = reader.last_row_at.max(at);
                true
            }
            None => false,
        }
    }

    /// Record that a row was acknowledged as applied at `at`.
    pub fn record_acknowledged(&mut self, at: Instant) -> bool {
        match self.reader.as_mut() {
            Some(reader) => {
                reader.last_ack_at = reader.last_ack_at.max(at);
                true
            }
            None => false,
        }
    }

    /// Time since the last acknowledgement, if a reader is attached.
    pub fn lag(&self, now: Instant) -> Option<Duration> {
        self.reader
            .as_ref()
            .map(|reader| now.saturating_duration_since(reader.last_ack_at))
    }

    /// Time since the last received row, if a reader is attached.
    pub fn idle(&self, now: Instant) -> Option<Duration> {
        self.reader
            .as_ref()
            .map(|reader| now.saturating_duration_since(reader.last_row_at))
    }

    /// Copy of all observable fields, evaluated against `now`.
    pub fn status(&self, now: Instant) -> PeerStatus {
        PeerStatus {
            peer_id: self.peer_id,
            source: self.source.clone(),
            state: self.state,
            lag: self.lag(now),
            idle: self.idle(now),
            message: self.message.clone(),
        }
    }
}
