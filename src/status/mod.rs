//! Node status snapshot
//!
//! Read-only, point-in-time view of the node: build version, identity,
//! vector clock, replication peers, lifecycle status, uptime and pid.
//!
//! # Consistency
//!
//! Sections are read one at a time, each under its own lock. A replication
//! record is always internally consistent; two different sections may reflect
//! slightly different moments.
//!
//! # Usage
//!
//! ```ignore
//! use nodestat::status::{StatusSection, StatusSnapshotBuilder};
//!
//! let snapshot = StatusSnapshotBuilder::new(&registry).build()?;
//! let vclock = snapshot.section(StatusSection::Vclock)?;
//! ```

mod builder;
mod errors;
mod snapshot;

pub use builder::StatusSnapshotBuilder;
pub use errors::{StatusError, StatusResult};
pub use snapshot::{
    uptime_seconds, ClusterInfo, NodeInfo, Replication, ReplicationRecord, StatusSection,
    StatusSnapshot, UnknownSection,
};
