use std::path::Path;

use cw_conf::Configuration;
use cw_guard::ProximityGuard;
use cw_index::ConduitIndex;
use cw_store::ConduitStore;
use cw_types::{BlockPos, SpawnReason, WorldId};
use tracing::{debug, error, info};

/// File holding the conduit data inside the host provided data directory.
const DATA_FILE: &str = "conduits.yml";

/// Outcome of a spawn-candidate evaluation, to be translated back into the
/// host's control-flow idiom (e.g. vetoing the spawn event).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnDecision {
    Allow,
    Suppress,
}

impl SpawnDecision {
    pub fn is_suppressed(self) -> bool {
        self == Self::Suppress
    }
}

/// The assembled ConduitWard core: persistent store, spatial index and
/// proximity guard, kept consistent by this facade.
///
/// All methods take `&self` and are safe to call from whatever mix of
/// threads the host dispatches events on.
pub struct ConduitWard {
    store: ConduitStore,
    index: ConduitIndex,
    guard: ProximityGuard,
    debug: bool,
}

impl ConduitWard {
    /// Loads the conduit data file from `data_dir` and builds the query
    /// structures from it.
    ///
    /// A missing data file yields an empty conduit set. A damaged one is
    /// logged and likewise degrades to an empty set: availability of the
    /// proximity check wins over durability of past saves.
    pub fn enable(conf: &Configuration, data_dir: &Path) -> Self {
        let store = ConduitStore::new(data_dir.join(DATA_FILE));
        if let Err(err) = store.load() {
            error!("Failed to load conduit data, continuing with an empty set: {err}");
        }

        let index = ConduitIndex::new();
        index.rebuild_from(&store);

        let mut count = 0;
        store.for_each(|_, _| count += 1);
        info!("ConduitWard enabled with {count} known conduits");

        Self {
            store,
            index,
            guard: ProximityGuard::new(conf.policy().clone()),
            debug: conf.debug(),
        }
    }

    /// Records a newly placed conduit in both the store and the index.
    /// Duplicate events for an already known position are no-ops.
    pub fn conduit_placed(&self, world: WorldId, pos: BlockPos) {
        if self.store.add(world, pos) {
            self.index.insert(world, pos);
        }
    }

    /// Records a destroyed conduit. Events for unknown positions are
    /// no-ops.
    pub fn conduit_removed(&self, world: WorldId, pos: BlockPos) {
        if self.store.remove(world, pos) {
            self.index.remove(world, pos);
        }
    }

    /// Decides whether a spawn candidate should be suppressed.
    ///
    /// Spawn causes outside the configured guarded set are allowed without
    /// consulting the index.
    pub fn spawn_candidate(
        &self,
        world: WorldId,
        pos: BlockPos,
        reason: SpawnReason,
    ) -> SpawnDecision {
        if !self.guard.guards(reason) {
            return SpawnDecision::Allow;
        }

        let decision = if self.guard.should_suppress(&self.index, world, pos) {
            SpawnDecision::Suppress
        } else {
            SpawnDecision::Allow
        };

        if self.debug {
            debug!(
                "{:?} spawn at {} (chunk {},{}) of world {world}",
                decision,
                pos,
                pos.chunk_x(),
                pos.chunk_z()
            );
        }
        decision
    }

    /// Persists the conduit set if it changed since the last save.
    ///
    /// Failures are logged, never propagated: the dirty state is retained
    /// and the next cadence retries the full save.
    pub fn save(&self) {
        match self.store.save() {
            Ok(true) => debug!("Conduit data saved"),
            Ok(false) => (),
            Err(err) => error!("Failed to save conduit data: {err}"),
        }
    }

    /// Number of suppressed spawn attempts since the previous call. Meant
    /// to be sampled periodically by an external metrics pipeline.
    pub fn suppressed_since_reset(&self) -> u64 {
        self.guard.suppressed_since_reset()
    }

    /// Final save; all in-memory state is discarded afterwards.
    pub fn shutdown(self) {
        self.save();
        info!("ConduitWard disabled");
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use uuid::Uuid;

    use super::*;

    fn world() -> WorldId {
        WorldId::new(Uuid::new_v4())
    }

    fn conf_from(dir: &Path, text: &str) -> Configuration {
        let path = dir.join("conf.yaml");
        fs::write(&path, text).unwrap();
        cw_conf::load_conf(&path).unwrap()
    }

    #[test]
    fn test_place_evaluate_remove() {
        let dir = tempfile::tempdir().unwrap();
        let ward = ConduitWard::enable(&Configuration::default(), dir.path());
        let w = world();
        let conduit = BlockPos::new(100, 40, 100);
        let candidate = BlockPos::new(110, 45, 110);

        assert_eq!(
            ward.spawn_candidate(w, candidate, SpawnReason::Natural),
            SpawnDecision::Allow
        );

        ward.conduit_placed(w, conduit);
        assert_eq!(
            ward.spawn_candidate(w, candidate, SpawnReason::Natural),
            SpawnDecision::Suppress
        );

        ward.conduit_removed(w, conduit);
        assert_eq!(
            ward.spawn_candidate(w, candidate, SpawnReason::Natural),
            SpawnDecision::Allow
        );
    }

    #[test]
    fn test_unguarded_reason_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let ward = ConduitWard::enable(&Configuration::default(), dir.path());
        let w = world();
        let conduit = BlockPos::new(0, 0, 0);

        ward.conduit_placed(w, conduit);
        assert_eq!(
            ward.spawn_candidate(w, conduit, SpawnReason::Spawner),
            SpawnDecision::Allow
        );
        // An allowed-by-reason decision must not bump the counter.
        assert_eq!(ward.suppressed_since_reset(), 0);
    }

    #[test]
    fn test_duplicate_events_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let ward = ConduitWard::enable(&Configuration::default(), dir.path());
        let w = world();
        let conduit = BlockPos::new(8, 64, 8);

        ward.conduit_placed(w, conduit);
        ward.conduit_placed(w, conduit);
        ward.conduit_removed(w, conduit);

        assert_eq!(
            ward.spawn_candidate(w, conduit, SpawnReason::Natural),
            SpawnDecision::Allow
        );
        ward.conduit_removed(w, conduit);
    }

    #[test]
    fn test_shutdown_persists_across_restart() {
        let dir = tempfile::tempdir().unwrap();
        let w = world();
        let conduit = BlockPos::new(-40, 60, 9);

        let ward = ConduitWard::enable(&Configuration::default(), dir.path());
        ward.conduit_placed(w, conduit);
        ward.shutdown();

        let ward = ConduitWard::enable(&Configuration::default(), dir.path());
        assert_eq!(
            ward.spawn_candidate(w, conduit, SpawnReason::Natural),
            SpawnDecision::Suppress
        );
    }

    #[test]
    fn test_precise_configuration_applies() {
        let dir = tempfile::tempdir().unwrap();
        let conf = conf_from(
            dir.path(),
            "proximity:\n  chunk-check-radius: 3\n  precise:\n    cutoff-distance: 32\n",
        );
        let ward = ConduitWard::enable(&conf, dir.path());
        let w = world();
        ward.conduit_placed(w, BlockPos::new(0, 0, 0));

        assert_eq!(
            ward.spawn_candidate(w, BlockPos::new(40, 0, 0), SpawnReason::Natural),
            SpawnDecision::Allow
        );
        assert_eq!(
            ward.spawn_candidate(w, BlockPos::new(20, 0, 0), SpawnReason::Natural),
            SpawnDecision::Suppress
        );
        assert_eq!(ward.suppressed_since_reset(), 1);
    }

    #[test]
    fn test_suppression_counter() {
        let dir = tempfile::tempdir().unwrap();
        let ward = ConduitWard::enable(&Configuration::default(), dir.path());
        let w = world();
        ward.conduit_placed(w, BlockPos::new(0, 0, 0));

        for _ in 0..3 {
            ward.spawn_candidate(w, BlockPos::new(4, 4, 4), SpawnReason::Natural);
        }
        assert_eq!(ward.suppressed_since_reset(), 3);
        assert_eq!(ward.suppressed_since_reset(), 0);
    }
}
