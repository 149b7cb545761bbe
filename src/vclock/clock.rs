//! Vector clock storage and merge rules

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use super::errors::{VectorClockError, VectorClockResult};

/// Numeric node identifier within a cluster
pub type NodeId = u32;

/// Log sequence number
pub type Lsn = u64;

/// Per-node log positions.
///
/// Backed by a `BTreeMap` so iteration is always ascending by node id,
/// which keeps rendered output deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VectorClock {
    entries: BTreeMap<NodeId, Lsn>,
}

impl VectorClock {
    /// Create an empty clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the LSN for a node. Absent entries read as 0 ("never observed").
    pub fn get(&self, node_id: NodeId) -> Lsn {
        self.entries.get(&node_id).copied().unwrap_or(0)
    }

    /// Move a node's entry forward.
    ///
    /// Equal values are accepted as a no-op. A lower value fails with
    /// [`VectorClockError::Regression`] and the stored value is kept.
    pub fn advance(&mut self, node_id: NodeId, lsn: Lsn) -> VectorClockResult<()> {
        match self.entries.entry(node_id) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(lsn);
                Ok(())
            }
            btree_map::Entry::Occupied(mut slot) => {
                let current = *slot.get();
                if lsn < current {
                    return Err(VectorClockError::Regression {
                        node_id,
                        current,
                        attempted: lsn,
                    });
                }
                slot.insert(lsn);
                Ok(())
            }
        }
    }

    /// Combine two clocks, taking the maximum for every node present in either.
    pub fn merge(&self, other: &VectorClock) -> VectorClock {
        let mut merged = self.clone();
        for (&node_id, &lsn) in &other.entries {
            let slot = merged.entries.entry(node_id).or_insert(lsn);
            if lsn > *slot {
                *slot = lsn;
            }
        }
        merged
    }

    /// Ordered copy of all entries, ascending by node id.
    pub fn snapshot_entries(&self) -> Vec<(NodeId, Lsn)> {
        self.iter().collect()
    }

    /// Iterate entries in ascending node id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Lsn)> + '_ {
        self.entries.iter().map(|(&id, &lsn)| (id, lsn))
    }

    /// Number of nodes with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every entry of `self` is at or below the matching entry of `other`.
    pub fn is_dominated_by(&self, other: &VectorClock) -> bool {
        self.entries
            .iter()
            .all(|(&node_id, &lsn)| lsn <= other.get(node_id))
    }
}

impl FromIterator<(NodeId, Lsn)> for VectorClock {
    /// Builds a clock; repeated node ids keep the highest LSN.
    fn from_iter<I: IntoIterator<Item = (NodeId, Lsn)>>(iter: I) -> Self {
        let mut clock = VectorClock::new();
        for (node_id, lsn) in iter {
            let slot = clock.entries.entry(node_id).or_insert(lsn);
            if lsn > *slot {
                *slot = lsn;
            }
        }
        clock
    }
}
