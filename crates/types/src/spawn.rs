//! Spawn-event vocabulary shared with host adapters.

use serde::Deserialize;

/// Cause of a spawn attempt as reported by the host.
///
/// Host adapters are expected to map their native spawn-reason taxonomy
/// onto this enum; causes with no counterpart here map to [`Self::Other`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpawnReason {
    /// Ordinary world spawning.
    Natural,
    /// Reinforcement waves called in by an already-spawned mob.
    Reinforcements,
    /// Spawning during initial chunk generation.
    ChunkGeneration,
    /// Mob spawner blocks.
    Spawner,
    /// Any cause not covered by the variants above.
    Other,
}
