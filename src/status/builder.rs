//! Status snapshot construction
//!
//! Each section is a separate query against the registry. A query takes at
//! most one lock at a time and holds it only while copying.

use std::time::Instant;

use super::errors::StatusResult;
use super::snapshot::{
    uptime_seconds, ClusterInfo, NodeInfo, Replication, ReplicationRecord, StatusSnapshot,
};
use crate::node::{build_info, LockPoisoned, NodeRegistry, NodeStatus};
use crate::observability::{log_event_with_fields, Event};
use crate::replication::ReplicationPeer;
use crate::vclock::VectorClock;

/// Builds status snapshots from a registry.
#[derive(Debug, Clone, Copy)]
pub struct StatusSnapshotBuilder<'a> {
    registry: &'a NodeRegistry,
}

impl<'a> StatusSnapshotBuilder<'a> {
    pub fn new(registry: &'a NodeRegistry) -> Self {
        Self { registry }
    }

    /// Build a full snapshot.
    ///
    /// Fails only when a lock was poisoned by a panicking writer.
    pub fn build(&self) -> StatusResult<StatusSnapshot> {
        let result = self.collect(Instant::now());
        if let Err(err) = &result {
            log_event_with_fields(Event::StatusFailed, &[("error", &err.to_string())]);
        }
        result
    }

    fn collect(&self, now: Instant) -> StatusResult<StatusSnapshot> {
        Ok(StatusSnapshot {
            version: self.version(),
            node: self.node()?,
            vclock: self.vclock()?,
            replication: self.replication_at(now)?,
            status: self.status()?,
            uptime: self.uptime(),
            pid: self.pid(),
            cluster: self.cluster(),
        })
    }

    pub fn version(&self) -> String {
        build_info().version.clone()
    }

    pub fn node(&self) -> StatusResult<NodeInfo> {
        let identity = self.registry.identity();
        Ok(NodeInfo {
            id: identity.node_id(),
            uuid: identity.node_uuid_str(),
            lsn: self.registry.local_lsn()?,
            read_only: identity.is_read_only(),
        })
    }

    pub fn vclock(&self) -> StatusResult<VectorClock> {
        let entries = self.registry.vclock_entries()?;
        Ok(entries.into_iter().collect())
    }

    pub fn replication(&self) -> StatusResult<Replication> {
        self.replication_at(Instant::now())
    }

    /// Replication section with lag and idle evaluated against `now`.
    ///
    /// Every record is copied under its own peer lock, so state, reader
    /// metrics and message always come from the same moment.
    pub fn replication_at(&self, now: Instant) -> StatusResult<Replication> {
        let peers = self.registry.peers()?;
        if peers.is_empty() {
            return Ok(Replication::Off);
        }

        let mut records = Vec::with_capacity(peers.len());
        for shared in &peers {
            let peer = shared.read().map_err(|_| LockPoisoned("peer"))?;
            records.push(Self::record(&peer, now));
        }
        Ok(Replication::Peers(records))
    }

    fn record(peer: &ReplicationPeer, now: Instant) -> ReplicationRecord {
        peer.status(now).into()
    }

    pub fn status(&self) -> StatusResult<NodeStatus> {
        Ok(self.registry.status()?)
    }

    pub fn uptime(&self) -> u64 {
        uptime_seconds(self.registry.uptime())
    }

    pub fn pid(&self) -> u32 {
        self.registry.pid()
    }

    pub fn cluster(&self) -> ClusterInfo {
        ClusterInfo {
            uuid: self.registry.identity().cluster_uuid_str(),
        }
    }
}
