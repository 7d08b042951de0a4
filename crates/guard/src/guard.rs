use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashSet;
use cw_index::{ConduitIndex, PreciseCutoff};
use cw_types::{BlockPos, SpawnReason, WorldId};

/// Validated proximity parameters applied to every spawn decision.
///
/// Values arrive here already validated by the configuration boundary; the
/// decision logic assumes a sane, non-negative radius.
#[derive(Clone, Debug)]
pub struct ProximityPolicy {
    chunk_radius: u32,
    precise: Option<PreciseCutoff>,
    guarded_reasons: AHashSet<SpawnReason>,
}

impl ProximityPolicy {
    /// # Arguments
    ///
    /// * `chunk_radius` - number of chunks scanned in each direction around
    ///   a spawn candidate.
    ///
    /// * `precise` - optional exact-distance criterion; `None` selects the
    ///   cheap chunk-presence check.
    ///
    /// * `guarded_reasons` - spawn causes subject to suppression; all other
    ///   causes are allowed without consulting the index.
    pub fn new(
        chunk_radius: u32,
        precise: Option<PreciseCutoff>,
        guarded_reasons: AHashSet<SpawnReason>,
    ) -> Self {
        Self {
            chunk_radius,
            precise,
            guarded_reasons,
        }
    }

    pub fn chunk_radius(&self) -> u32 {
        self.chunk_radius
    }

    pub fn precise(&self) -> Option<PreciseCutoff> {
        self.precise
    }
}

impl Default for ProximityPolicy {
    /// Coarse mode with a 2 chunk scan radius, guarding natural spawning
    /// and reinforcement waves.
    fn default() -> Self {
        Self::new(
            2,
            None,
            AHashSet::from_iter([SpawnReason::Natural, SpawnReason::Reinforcements]),
        )
    }
}

/// Stateless spawn suppression decision plus a rolling counter of
/// suppressed attempts.
///
/// The counter is the only mutable state and is atomic, so metrics
/// sampling via [`Self::suppressed_since_reset`] is safe against
/// concurrent decisions.
pub struct ProximityGuard {
    policy: ProximityPolicy,
    suppressed: AtomicU64,
}

impl ProximityGuard {
    pub fn new(policy: ProximityPolicy) -> Self {
        Self {
            policy,
            suppressed: AtomicU64::new(0),
        }
    }

    /// Returns whether spawns with the given cause are subject to
    /// suppression at all.
    pub fn guards(&self, reason: SpawnReason) -> bool {
        self.policy.guarded_reasons.contains(&reason)
    }

    /// Returns true iff a conduit lies within the configured proximity of
    /// `point`, counting the suppression when it does.
    pub fn should_suppress(&self, index: &ConduitIndex, world: WorldId, point: BlockPos) -> bool {
        let near = index.query_radius(
            world,
            point,
            self.policy.chunk_radius(),
            self.policy.precise(),
        );
        if near {
            self.suppressed.fetch_add(1, Ordering::Relaxed);
        }
        near
    }

    /// Returns the number of suppressed spawn attempts since the previous
    /// call and resets the counter, atomically.
    pub fn suppressed_since_reset(&self) -> u64 {
        self.suppressed.swap(0, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn world() -> WorldId {
        WorldId::new(Uuid::new_v4())
    }

    #[test]
    fn test_default_guarded_reasons() {
        let guard = ProximityGuard::new(ProximityPolicy::default());

        assert!(guard.guards(SpawnReason::Natural));
        assert!(guard.guards(SpawnReason::Reinforcements));
        assert!(!guard.guards(SpawnReason::ChunkGeneration));
        assert!(!guard.guards(SpawnReason::Spawner));
        assert!(!guard.guards(SpawnReason::Other));
    }

    #[test]
    fn test_should_suppress_applies_policy() {
        let index = ConduitIndex::new();
        let w = world();
        // Conduit in chunk (0, 0), candidate in chunk (3, 0).
        index.insert(w, BlockPos::new(8, 64, 8));
        let candidate = BlockPos::new(56, 64, 8);

        let near = ProximityGuard::new(ProximityPolicy::new(3, None, AHashSet::new()));
        let far = ProximityGuard::new(ProximityPolicy::new(2, None, AHashSet::new()));

        assert!(near.should_suppress(&index, w, candidate));
        assert!(!far.should_suppress(&index, w, candidate));
    }

    #[test]
    fn test_counter_get_and_reset() {
        let index = ConduitIndex::new();
        let w = world();
        index.insert(w, BlockPos::new(0, 0, 0));
        let guard = ProximityGuard::new(ProximityPolicy::default());

        assert_eq!(guard.suppressed_since_reset(), 0);

        for _ in 0..5 {
            assert!(guard.should_suppress(&index, w, BlockPos::new(4, 0, 4)));
        }
        // A miss does not count.
        assert!(!guard.should_suppress(&index, w, BlockPos::new(4000, 0, 4000)));

        assert_eq!(guard.suppressed_since_reset(), 5);
        assert_eq!(guard.suppressed_since_reset(), 0);
    }
}
