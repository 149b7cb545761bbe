//! Node lifecycle status and build metadata

use std::fmt;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

/// Overall node status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    /// Recovering local state, not serving yet
    Loading,
    /// Serving normally
    Running,
    /// Serving, but could not reach enough peers to join the cluster
    Orphan,
    /// Shutting down; no further mutations
    Stopping,
}

impl NodeStatus {
    pub const ALL: [NodeStatus; 4] = [
        NodeStatus::Loading,
        NodeStatus::Running,
        NodeStatus::Orphan,
        NodeStatus::Stopping,
    ];

    /// External status keyword.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Running => "running",
            Self::Orphan => "orphan",
            Self::Stopping => "stopping",
        }
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for NodeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Static build metadata, computed once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
}

/// Build metadata for this process.
///
/// `NODESTAT_BUILD_COMMIT`, when set at compile time, is appended to the
/// package version.
pub fn build_info() -> &'static BuildInfo {
    static BUILD_INFO: OnceLock<BuildInfo> = OnceLock::new();
    BUILD_INFO.get_or_init(|| {
        let version = match option_env!("NODESTAT_BUILD_COMMIT") {
            Some(commit) if !commit.is_empty() => {
                format!("{}-{}", env!("CARGO_PKG_VERSION"), commit)
            }
            _ => env!("CARGO_PKG_VERSION").to_string(),
        };
        BuildInfo { version }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_status_labels_distinct_lowercase() {
        let labels: HashSet<&str> = NodeStatus::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels.len(), NodeStatus::ALL.len());
        for label in labels {
            assert_eq!(label, label.to_lowercase());
        }
    }

    #[test]
    fn test_build_info_cached() {
        let first = build_info();
        let second = build_info();
        assert!(std::ptr::eq(first, second));
        assert!(first.version.starts_with(env!("CARGO_PKG_VERSION")));
    }
}
