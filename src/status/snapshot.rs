//! Status snapshot value types
//!
//! A snapshot is a plain value: building it copies everything out of the
//! registry, rendering it touches no shared state.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::node::NodeStatus;
use crate::replication::{PeerState, PeerStatus};
use crate::vclock::{Lsn, NodeId, VectorClock};

/// Local node fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub uuid: String,
    /// Local entry of the vector clock
    pub lsn: Lsn,
    #[serde(rename = "readOnly")]
    pub read_only: bool,
}

/// Cluster fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterInfo {
    pub uuid: String,
}

/// One inbound stream as reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationRecord {
    pub peer: NodeId,
    pub source: String,
    pub status: PeerState,
    /// Seconds since the last acknowledged row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag: Option<f64>,
    /// Seconds since any row was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PeerStatus> for ReplicationRecord {
    fn from(status: PeerStatus) -> Self {
        Self {
            peer: status.peer_id,
            source: status.source,
            status: status.state,
            lag: status.lag.map(|lag| lag.as_secs_f64()),
            idle: status.idle.map(|idle| idle.as_secs_f64()),
            message: status.message,
        }
    }
}

/// Replication section.
///
/// Renders as `{"status": "off"}` when no peers are configured, otherwise as
/// an array of records ascending by peer id.
#[derive(Debug, Clone, PartialEq)]
pub enum Replication {
    Off,
    Peers(Vec<ReplicationRecord>),
}

impl Replication {
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    /// Reported records; empty when replication is off.
    pub fn records(&self) -> &[ReplicationRecord] {
        match self {
            Self::Off => &[],
            Self::Peers(records) => records,
        }
    }
}

impl Serialize for Replication {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Off => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("status", "off")?;
                map.end()
            }
            Self::Peers(records) => records.serialize(serializer),
        }
    }
}

/// Point-in-time status of the node.
///
/// Each field is internally consistent; fields were read one at a time, so the
/// snapshot as a whole is not a single atomic view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub version: String,
    pub node: NodeInfo,
    pub vclock: VectorClock,
    pub replication: Replication,
    pub status: NodeStatus,
    /// Whole seconds since bootstrap, never below 1
    pub uptime: u64,
    pub pid: u32,
    pub cluster: ClusterInfo,
}

impl StatusSnapshot {
    /// One section rendered as JSON.
    pub fn section(&self, section: StatusSection) -> serde_json::Result<Value> {
        match section {
            StatusSection::Version => serde_json::to_value(&self.version),
            StatusSection::Node => serde_json::to_value(&self.node),
            StatusSection::Vclock => serde_json::to_value(&self.vclock),
            StatusSection::Replication => serde_json::to_value(&self.replication),
            StatusSection::Status => serde_json::to_value(self.status),
            StatusSection::Uptime => serde_json::to_value(self.uptime),
            StatusSection::Pid => serde_json::to_value(self.pid),
            StatusSection::Cluster => serde_json::to_value(&self.cluster),
        }
    }

    /// Whole snapshot rendered as JSON.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Reported uptime in whole seconds.
///
/// A node that just booted reports 1, never 0.
pub fn uptime_seconds(elapsed: Duration) -> u64 {
    elapsed.as_secs().max(1)
}

/// Top-level section of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusSection {
    Version,
    Node,
    Vclock,
    Replication,
    Status,
    Uptime,
    Pid,
    Cluster,
}

impl StatusSection {
    /// Every section, in rendering order.
    pub const ALL: [StatusSection; 8] = [
        StatusSection::Version,
        StatusSection::Node,
        StatusSection::Vclock,
        StatusSection::Replication,
        StatusSection::Status,
        StatusSection::Uptime,
        StatusSection::Pid,
        StatusSection::Cluster,
    ];

    /// JSON key of the section.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Version => "version",
            Self::Node => "node",
            Self::Vclock => "vclock",
            Self::Replication => "replication",
            Self::Status => "status",
            Self::Uptime => "uptime",
            Self::Pid => "pid",
            Self::Cluster => "cluster",
        }
    }
}

impl fmt::Display for StatusSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown section name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status section '{0}'")]
pub struct UnknownSection(pub String);

impl FromStr for StatusSection {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.name() == s)
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}
