//! Cluster identity
//!
//! The cluster UUID, the local node UUID and numeric id, and the read-only
//! flag. Fixed at bootstrap and never mutated afterwards.

mod identity;

pub use identity::{ClusterIdentity, IdentityError, IdentityResult};
