//! Vector clock
//!
//! Per-node map of the last known log sequence number. Entries only ever move
//! forward; merging two clocks takes the per-node maximum.

mod clock;
mod errors;

pub use clock::{Lsn, NodeId, VectorClock};
pub use errors::{VectorClockError, VectorClockResult};
