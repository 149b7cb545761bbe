//! Process-scoped node state
//!
//! Holds the identity, the vector clock and the peer table of one node.
//! Constructed once at bootstrap and passed explicitly to whoever needs it.
//!
//! Locking: the vector clock, the peer table, the node status and every peer
//! record each sit behind their own lock. Readers take them one at a time and
//! never hold two at once.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use super::config::NodeConfig;
use super::errors::{LockPoisoned, NodeError, NodeResult};
use super::lifecycle::NodeStatus;
use crate::cluster::ClusterIdentity;
use crate::observability::{log_event_at, log_event_with_fields, Event, Severity};
use crate::replication::{PeerError, PeerEvent, PeerState, ReplicationPeer};
use crate::vclock::{Lsn, NodeId, VectorClock, VectorClockError};

/// A peer record behind its own lock
pub type SharedPeer = Arc<RwLock<ReplicationPeer>>;

fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    what: &'static str,
) -> Result<RwLockReadGuard<'a, T>, LockPoisoned> {
    lock.read().map_err(|_| LockPoisoned(what))
}

fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    what: &'static str,
) -> Result<RwLockWriteGuard<'a, T>, LockPoisoned> {
    lock.write().map_err(|_| LockPoisoned(what))
}

/// Log fields of a peer transition. `event` and `severity` belong to the
/// logger, so the transport event goes under `peer_event`.
fn transition_fields<'a>(
    peer: &'a str,
    peer_event: &'a str,
    from: PeerState,
    to: Option<PeerState>,
    message: Option<&'a str>,
) -> Vec<(&'static str, &'a str)> {
    let mut fields = vec![("from", from.label()), ("peer", peer), ("peer_event", peer_event)];
    if let Some(to) = to {
        fields.push(("to", to.label()));
    }
    if let Some(message) = message {
        fields.push(("message", message));
    }
    fields
}

/// State of the local node
#[derive(Debug)]
pub struct NodeRegistry {
    identity: ClusterIdentity,
    vclock: RwLock<VectorClock>,
    peers: RwLock<BTreeMap<NodeId, SharedPeer>>,
    status: RwLock<NodeStatus>,
    started_at: Instant,
    pid: u32,
    shut_down: AtomicBool,
}

impl NodeRegistry {
    /// Bootstrap the registry once the identity is known.
    ///
    /// The vector clock starts with an entry for the local node at LSN 0 and
    /// the node is `running`.
    pub fn bootstrap(identity: ClusterIdentity) -> Self {
        let vclock: VectorClock = [(identity.node_id(), 0)].into_iter().collect();

        let registry = Self {
            identity,
            vclock: RwLock::new(vclock),
            peers: RwLock::new(BTreeMap::new()),
            status: RwLock::new(NodeStatus::Running),
            started_at: Instant::now(),
            pid: std::process::id(),
            shut_down: AtomicBool::new(false),
        };

        log_event_with_fields(
            Event::BootComplete,
            &[
                ("cluster_uuid", &registry.identity.cluster_uuid_str()),
                ("node_id", &registry.identity.node_id().to_string()),
                ("node_uuid", &registry.identity.node_uuid_str()),
            ],
        );

        registry
    }

    /// Bootstrap from a validated configuration: identity, seed clock, peers.
    pub fn from_config(config: &NodeConfig) -> NodeResult<Self> {
        let identity = config.to_identity()?;
        let registry = Self::bootstrap(identity);

        let seed: VectorClock = config.vclock.iter().map(|(&id, &lsn)| (id, lsn)).collect();
        registry.merge_vclock(&seed)?;

        for peer in &config.peers {
            registry.add_peer(peer.id, peer.source.clone())?;
        }

        Ok(registry)
    }

    pub fn identity(&self) -> &ClusterIdentity {
        &self.identity
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Time since bootstrap.
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    // ==================
    // Lifecycle
    // ==================

    /// Stop accepting mutations. Reads keep working.
    pub fn shutdown(&self) -> NodeResult<()> {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        log_event_with_fields(Event::ShutdownStart, &[]);
        *write_lock(&self.status, "node status")? = NodeStatus::Stopping;
        log_event_with_fields(Event::ShutdownComplete, &[]);
        Ok(())
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> NodeResult<()> {
        if self.is_shut_down() {
            return Err(NodeError::ShutDown);
        }
        Ok(())
    }

    pub fn status(&self) -> Result<NodeStatus, LockPoisoned> {
        Ok(*read_lock(&self.status, "node status")?)
    }

    pub fn set_status(&self, status: NodeStatus) -> NodeResult<()> {
        self.ensure_open()?;
        let mut current = write_lock(&self.status, "node status")?;
        if *current != status {
            log_event_with_fields(
                Event::NodeStatusChanged,
                &[("from", current.label()), ("to", status.label())],
            );
            *current = status;
        }
        Ok(())
    }

    // ==================
    // Vector clock
    // ==================

    /// Ordered copy of the vector clock.
    pub fn vclock_entries(&self) -> Result<Vec<(NodeId, Lsn)>, LockPoisoned> {
        Ok(read_lock(&self.vclock, "vclock")?.snapshot_entries())
    }

    /// Copy of the vector clock.
    pub fn vclock(&self) -> Result<VectorClock, LockPoisoned> {
        Ok(read_lock(&self.vclock, "vclock")?.clone())
    }

    /// LSN of the local node.
    pub fn local_lsn(&self) -> Result<Lsn, LockPoisoned> {
        Ok(read_lock(&self.vclock, "vclock")?.get(self.identity.node_id()))
    }

    /// Advance one vector clock entry.
    ///
    /// A regression is logged and returned; the entry keeps its value.
    pub fn advance_vclock(&self, node_id: NodeId, lsn: Lsn) -> NodeResult<()> {
        self.ensure_open()?;
        let result = write_lock(&self.vclock, "vclock")?.advance(node_id, lsn);
        if let Err(VectorClockError::Regression {
            node_id,
            current,
            attempted,
        }) = &result
        {
            log_event_at(
                Severity::Warn,
                Event::VclockRegression,
                &[
                    ("attempted", &attempted.to_string()),
                    ("current", &current.to_string()),
                    ("node_id", &node_id.to_string()),
                ],
            );
        }
        Ok(result?)
    }

    /// Fold another clock into ours, entry by entry, never regressing.
    pub fn merge_vclock(&self, other: &VectorClock) -> NodeResult<()> {
        self.ensure_open()?;
        let mut vclock = write_lock(&self.vclock, "vclock")?;
        *vclock = vclock.merge(other);
        Ok(())
    }

    // ==================
    // Topology
    // ==================

    /// Configure a new peer in the `offline` state.
    pub fn add_peer(&self, peer_id: NodeId, source: impl Into<String>) -> NodeResult<SharedPeer> {
        self.ensure_open()?;
        if peer_id == self.identity.node_id() {
            return Err(NodeError::LocalPeer(peer_id));
        }

        let mut peers = write_lock(&self.peers, "peer table")?;
        if peers.contains_key(&peer_id) {
            return Err(NodeError::DuplicatePeer(peer_id));
        }

        let peer = ReplicationPeer::new(peer_id, source);
        log_event_with_fields(
            Event::PeerAdded,
            &[("peer", &peer_id.to_string()), ("source", peer.source())],
        );
        let shared = Arc::new(RwLock::new(peer));
        peers.insert(peer_id, Arc::clone(&shared));
        Ok(shared)
    }

    /// Remove a peer from the topology.
    pub fn remove_peer(&self, peer_id: NodeId) -> NodeResult<()> {
        self.ensure_open()?;
        let removed = write_lock(&self.peers, "peer table")?.remove(&peer_id);
        match removed {
            Some(_) => {
                log_event_with_fields(Event::PeerRemoved, &[("peer", &peer_id.to_string())]);
                Ok(())
            }
            None => Err(NodeError::UnknownPeer(peer_id)),
        }
    }

    /// Handle of one peer.
    pub fn peer(&self, peer_id: NodeId) -> NodeResult<SharedPeer> {
        read_lock(&self.peers, "peer table")?
            .get(&peer_id)
            .cloned()
            .ok_or(NodeError::UnknownPeer(peer_id))
    }

    /// Handles of all peers, ascending by id.
    ///
    /// The table lock is released before returning; each handle is locked
    /// separately by the caller.
    pub fn peers(&self) -> Result<Vec<SharedPeer>, LockPoisoned> {
        Ok(read_lock(&self.peers, "peer table")?.values().cloned().collect())
    }

    pub fn peer_count(&self) -> Result<usize, LockPoisoned> {
        Ok(read_lock(&self.peers, "peer table")?.len())
    }

    // ==================
    // Transport entry points
    // ==================

    /// Apply a transport event to a peer.
    pub fn apply_peer_event(
        &self,
        peer_id: NodeId,
        event: PeerEvent,
        at: Instant,
    ) -> NodeResult<PeerState> {
        self.ensure_open()?;
        let shared = self.peer(peer_id)?;
        let mut peer = write_lock(&shared, "peer")?;

        let from = peer.state();
        let event_name = event.name();
        let message = event.message().map(str::to_owned);
        let peer_field = peer_id.to_string();

        match peer.apply(event, at) {
            Ok(to) => {
                let fields =
                    transition_fields(&peer_field, event_name, from, Some(to), message.as_deref());
                if to == PeerState::Errored {
                    log_event_at(Severity::Error, Event::PeerFault, &fields);
                } else {
                    log_event_with_fields(Event::PeerTransition, &fields);
                }
                Ok(to)
            }
            Err(err @ PeerError::InvalidTransition { .. }) => {
                log_event_at(
                    Severity::Warn,
                    Event::PeerTransitionRejected,
                    &transition_fields(&peer_field, event_name, from, None, None),
                );
                Err(err.into())
            }
        }
    }

    /// Record a received row. Returns whether a reader was attached.
    pub fn record_row_received(&self, peer_id: NodeId, at: Instant) -> NodeResult<bool> {
        self.ensure_open()?;
        let shared = self.peer(peer_id)?;
        let accepted = write_lock(&shared, "peer")?.record_row_received(at);
        Ok(accepted)
    }

    /// Record an acknowledged row. Returns whether a reader was attached.
    pub fn record_acknowledged(&self, peer_id: NodeId, at: Instant) -> NodeResult<bool> {
        self.ensure_open()?;
        let shared = self.peer(peer_id)?;
        let accepted = write_lock(&shared, "peer")?.record_acknowledged(at);
        Ok(accepted)
    }
}
