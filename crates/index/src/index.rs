//! This module contains the chunk partitioned index of conduit positions
//! and the proximity query evaluated against it.

use cw_store::ConduitStore;
use cw_types::{BlockPos, ChunkKey, WorldId};
use dashmap::DashMap;
use glam::IVec2;

use crate::range::ChunkRange;

/// Precise proximity criterion applied to the conduits of each scanned
/// chunk.
///
/// Without it, a query succeeds as soon as any scanned chunk holds a
/// conduit at all. With it, some conduit must additionally lie within the
/// vertical tolerance and within the full 3D Euclidean cutoff distance of
/// the query point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreciseCutoff {
    distance: u32,
    vertical_tolerance: u32,
}

impl PreciseCutoff {
    pub const fn new(distance: u32, vertical_tolerance: u32) -> Self {
        Self {
            distance,
            vertical_tolerance,
        }
    }

    fn admits(&self, conduit: BlockPos, point: BlockPos) -> bool {
        let dy = (i64::from(conduit.y()) - i64::from(point.y())).abs();
        if dy > i64::from(self.vertical_tolerance) {
            return false;
        }

        let dx = i128::from(conduit.x()) - i128::from(point.x());
        let dz = i128::from(conduit.z()) - i128::from(point.z());
        let dy = i128::from(dy);
        // Exact integer arithmetic; i128 cannot overflow for i32 inputs.
        dx * dx + dy * dy + dz * dz <= i128::from(self.distance).pow(2)
    }
}

/// Chunk partitioned index of conduit positions across worlds.
///
/// Only non-empty chunk lists are kept: a chunk entry emptied by a removal
/// is pruned immediately, and so is a world entry left without chunks. All
/// methods take `&self`; the nested [`DashMap`]s provide interior
/// mutability with per-shard locking, so no process-wide lock is ever
/// held.
pub struct ConduitIndex {
    worlds: DashMap<WorldId, DashMap<ChunkKey, Vec<BlockPos>>>,
}

impl ConduitIndex {
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            worlds: DashMap::new(),
        }
    }

    /// Inserts a conduit position to the list of its chunk, creating the
    /// world and chunk entries on demand.
    pub fn insert(&self, world: WorldId, pos: BlockPos) {
        self.worlds
            .entry(world)
            .or_default()
            .entry(pos.chunk_key())
            .or_default()
            .push(pos);
    }

    /// Removes one occurrence of a conduit position from the list of its
    /// chunk. An emptied chunk entry is pruned, then an emptied world
    /// entry. Unknown worlds and absent positions are no-ops.
    pub fn remove(&self, world: WorldId, pos: BlockPos) {
        if let Some(chunks) = self.worlds.get(&world) {
            chunks.remove_if_mut(&pos.chunk_key(), |_, conduits| {
                if let Some(index) = conduits.iter().position(|&c| c == pos) {
                    conduits.swap_remove(index);
                }
                conduits.is_empty()
            });
        }
        self.worlds.remove_if(&world, |_, chunks| chunks.is_empty());
    }

    /// Returns whether any conduit lies within proximity of `point`.
    ///
    /// The `(2 * chunk_radius + 1)²` square of chunks centered on the
    /// point's chunk is scanned. Without `precise`, the presence of any
    /// conduit in a scanned chunk is sufficient; vertical distance is
    /// ignored entirely and points near the square's corners may be
    /// accepted farther out than its edges. With `precise`, at least one
    /// conduit of a scanned chunk must satisfy [`PreciseCutoff::admits`].
    ///
    /// A world unknown to the index yields `false`.
    pub fn query_radius(
        &self,
        world: WorldId,
        point: BlockPos,
        chunk_radius: u32,
        precise: Option<PreciseCutoff>,
    ) -> bool {
        let Some(chunks) = self.worlds.get(&world) else {
            return false;
        };

        let center = IVec2::new(point.chunk_x(), point.chunk_z());
        for chunk in ChunkRange::around(center, chunk_radius as i32) {
            let Some(conduits) = chunks.get(&ChunkKey::new(chunk.x, chunk.y)) else {
                continue;
            };
            match precise {
                // Chunk entries are never empty, so presence decides.
                None => return true,
                Some(cutoff) => {
                    if conduits.iter().any(|&c| cutoff.admits(c, point)) {
                        return true;
                    }
                }
            }
        }

        false
    }

    /// Clears the index and repopulates it from every `(world, position)`
    /// pair of the store. Used once at startup; never on the query path.
    pub fn rebuild_from(&self, store: &ConduitStore) {
        self.worlds.clear();
        store.for_each(|world, pos| self.insert(world, pos));
    }

    /// Number of non-empty chunks indexed for a world.
    pub fn chunk_count(&self, world: WorldId) -> usize {
        self.worlds.get(&world).map_or(0, |chunks| chunks.len())
    }

    /// Returns true iff no world holds any conduit.
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }
}

impl Default for ConduitIndex {
    fn default() -> Self {
        Self::new()
    }
}
