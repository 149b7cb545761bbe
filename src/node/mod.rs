//! Node registry
//!
//! The explicit, process-scoped state of one cluster node: identity, vector
//! clock, peer table and lifecycle status. Built once at bootstrap from a
//! configuration, mutated only by transport-driven callers, and frozen by
//! `shutdown()`.

mod config;
mod errors;
mod lifecycle;
mod registry;

pub use config::{ConfigError, ConfigResult, NodeConfig, PeerConfig};
pub use errors::{LockPoisoned, NodeError, NodeResult};
pub use lifecycle::{build_info, BuildInfo, NodeStatus};
pub use registry::{NodeRegistry, SharedPeer};
