//! nodestat - replication status of a cluster node
//!
//! A node tracks its identity, a vector clock of applied log positions and
//! the state of every inbound replication stream. [`status`] turns that into
//! a consistent, read-only snapshot.

pub mod cli;
pub mod cluster;
pub mod node;
pub mod observability;
pub mod replication;
pub mod status;
pub mod vclock;
