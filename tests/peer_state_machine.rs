//! Replication Peer Tests
//!
//! - Valid transport events move the peer through its lifecycle
//! - Invalid events are rejected and change nothing
//! - Stopped and errored are absorbing
//! - Lag and idle exist exactly when a reader is attached

use std::time::{Duration, Instant};

use nodestat::replication::{PeerError, PeerEvent, PeerState, ReaderHandle, ReplicationPeer};

fn sync_started(raw: u64) -> PeerEvent {
    PeerEvent::SyncStarted {
        reader: ReaderHandle::new(raw),
    }
}

fn disconnected(message: &str) -> PeerEvent {
    PeerEvent::Disconnected {
        message: message.to_string(),
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Full path to following, then a reconnect cycle.
#[test]
fn test_follow_disconnect_and_resync() {
    let now = Instant::now();
    let mut peer = ReplicationPeer::new(2, "replicator@10.0.0.2:3301");

    peer.apply(PeerEvent::Connect, now).unwrap();
    peer.apply(PeerEvent::Established, now).unwrap();
    peer.apply(sync_started(1), now).unwrap();
    assert_eq!(peer.apply(PeerEvent::SyncComplete, now).unwrap(), PeerState::Following);

    assert_eq!(
        peer.apply(disconnected("connection reset"), now).unwrap(),
        PeerState::Connecting
    );
    assert_eq!(peer.message(), Some("connection reset"));
    assert!(peer.reader().is_none());

    peer.apply(sync_started(2), now).unwrap();
    assert_eq!(peer.reader(), Some(ReaderHandle::new(2)));
    assert_eq!(peer.message(), Some("connection reset"));

    peer.apply(PeerEvent::SyncComplete, now).unwrap();
    assert_eq!(peer.state(), PeerState::Following);
    assert_eq!(peer.message(), None);
}

/// An invalid event leaves the peer untouched.
#[test]
fn test_invalid_event_changes_nothing() {
    let now = Instant::now();
    let mut peer = ReplicationPeer::new(4, "d:3301");

    let err = peer.apply(PeerEvent::SyncComplete, now).unwrap_err();
    assert_eq!(
        err,
        PeerError::InvalidTransition {
            peer_id: 4,
            from: PeerState::Offline,
            event: "sync_complete",
        }
    );
    assert_eq!(peer.state(), PeerState::Offline);
}

/// Once errored, nothing moves the peer again.
#[test]
fn test_errored_is_absorbing() {
    let now = Instant::now();
    let mut peer = ReplicationPeer::new(2, "b:3301");
    peer.apply(PeerEvent::Connect, now).unwrap();
    peer.apply(
        PeerEvent::Fault {
            message: "incompatible cluster".to_string(),
        },
        now,
    )
    .unwrap();

    for event in [
        PeerEvent::Connect,
        PeerEvent::Established,
        sync_started(1),
        PeerEvent::SyncComplete,
        disconnected("eof"),
        PeerEvent::Stop,
    ] {
        assert!(peer.apply(event, now).is_err());
    }
    assert_eq!(peer.state(), PeerState::Errored);
    assert_eq!(peer.message(), Some("incompatible cluster"));
}

/// Stop from following drops the reader.
#[test]
fn test_stop_detaches_reader() {
    let now = Instant::now();
    let mut peer = ReplicationPeer::new(2, "b:3301");
    peer.apply(PeerEvent::Connect, now).unwrap();
    peer.apply(sync_started(1), now).unwrap();
    peer.apply(PeerEvent::Stop, now).unwrap();

    assert_eq!(peer.state(), PeerState::Stopped);
    assert_eq!(peer.lag(now), None);
    assert_eq!(peer.idle(now), None);
}

// =============================================================================
// Reader metrics
// =============================================================================

/// Reader attached 5s ago, last row 2s ago.
#[test]
fn test_idle_since_last_row() {
    let now = Instant::now();
    let attached = now - Duration::from_secs(5);
    let mut peer = ReplicationPeer::new(2, "b:3301");
    peer.apply(PeerEvent::Connect, attached).unwrap();
    peer.apply(sync_started(1), attached).unwrap();
    peer.apply(PeerEvent::SyncComplete, attached).unwrap();
    assert!(peer.record_row_received(now - Duration::from_secs(2)));

    let status = peer.status(now);
    assert_eq!(status.idle, Some(Duration::from_secs(2)));
    assert!(status.lag.is_some());
}

/// Every state agrees with whether lag is reported.
#[test]
fn test_metrics_present_only_with_reader() {
    for state in PeerState::ALL {
        assert_eq!(
            state.has_reader(),
            matches!(state, PeerState::Syncing | PeerState::Following),
            "{state}"
        );
    }
}
