//! ConduitWard suppresses a category of hostile spawning near player
//! placed conduits.
//!
//! The crate wires the persistent conduit store, the chunk partitioned
//! spatial index and the proximity guard into a single [`ConduitWard`]
//! object. A host adapter is expected to construct it at plugin enable,
//! feed it block place/break and spawn-candidate events, call
//! [`ConduitWard::save`] on a periodic cadence and
//! [`ConduitWard::shutdown`] at plugin disable.

mod ward;

pub use cw_conf::{load_conf, Configuration};
pub use cw_guard::{ProximityGuard, ProximityPolicy};
pub use cw_index::{ConduitIndex, PreciseCutoff};
pub use cw_log::{setup as setup_logging, LogGuard};
pub use cw_store::ConduitStore;
pub use cw_types::{BlockPos, ChunkKey, SpawnReason, WorldId};
pub use ward::{ConduitWard, SpawnDecision};
