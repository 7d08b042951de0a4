use std::{
    collections::BTreeMap,
    fs, io,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use ahash::{AHashMap, AHashSet};
use cw_types::{BlockPos, WorldId};
use thiserror::Error;
use tracing::warn;

type LoadingResult = Result<(), StoreLoadingError>;
type StoringResult = Result<bool, StoreStoringError>;

/// Persistent set of conduit positions, one set per world.
///
/// The on-disk representation is a YAML mapping from world UUID strings to
/// lists of `"x,y,z"` position strings. All mutating operations keep a
/// dirty flag which makes [`Self::save`] a no-op between changes, so bursts
/// of additions and removals are absorbed into a single write at the next
/// save cadence.
pub struct ConduitStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    worlds: AHashMap<WorldId, AHashSet<BlockPos>>,
    dirty: bool,
    /// Incremented on every membership change. [`ConduitStore::save`] writes
    /// the file outside the lock and may only clear the dirty flag if no
    /// mutation landed after its snapshot was taken.
    revision: u64,
}

impl Inner {
    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }
}

impl ConduitStore {
    /// Creates a store backed by the given file. No I/O happens until
    /// [`Self::load`] or [`Self::save`] is called.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Replaces the in-memory state with the contents of the backing file
    /// and clears the dirty flag.
    ///
    /// A missing file yields an empty store. Records with an unparseable
    /// world UUID or position string are skipped with a warning; only
    /// whole-file damage (unreadable file, invalid YAML document) is an
    /// error, and even then the store is left empty and usable.
    pub fn load(&self) -> LoadingResult {
        *self.lock() = Inner::default();

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(StoreLoadingError::Io { source: err }),
        };
        if text.trim().is_empty() {
            return Ok(());
        }

        let records: AHashMap<String, Vec<serde_yaml::Value>> = serde_yaml::from_str(&text)
            .map_err(|err| StoreLoadingError::YamlParsing { source: err })?;

        let mut worlds = AHashMap::with_capacity(records.len());
        for (world_key, positions) in records {
            let world: WorldId = match world_key.parse() {
                Ok(world) => world,
                Err(_) => {
                    warn!("Invalid world ID in conduit data file: {world_key}");
                    continue;
                }
            };

            let mut conduits = AHashSet::with_capacity(positions.len());
            for value in positions {
                let Some(text) = value.as_str() else {
                    warn!("Non-string position entry for world {world}");
                    continue;
                };
                match text.parse::<BlockPos>() {
                    Ok(pos) => {
                        conduits.insert(pos);
                    }
                    Err(err) => warn!("Skipping position of world {world}: {err}"),
                }
            }

            if !conduits.is_empty() {
                worlds.insert(world, conduits);
            }
        }

        self.lock().worlds = worlds;
        Ok(())
    }

    /// Serializes the full in-memory state to the backing file. Returns
    /// `Ok(true)` if a write happened and `Ok(false)` for the not-dirty
    /// no-op.
    ///
    /// The file is replaced atomically (temp file, then rename), so a crash
    /// mid-write leaves the previously saved data intact. The dirty flag is
    /// cleared only on success; on failure it stays set and the next save
    /// retries the full state.
    pub fn save(&self) -> StoringResult {
        let (snapshot, revision) = {
            let inner = self.lock();
            if !inner.dirty {
                return Ok(false);
            }
            (serialize(&inner.worlds), inner.revision)
        };

        let data = serde_yaml::to_string(&snapshot)
            .map_err(|err| StoreStoringError::YamlSerialization { source: err })?;
        self.replace_file(data.as_bytes())
            .map_err(|err| StoreStoringError::Io { source: err })?;

        let mut inner = self.lock();
        if inner.revision == revision {
            inner.dirty = false;
        }
        Ok(true)
    }

    fn replace_file(&self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("yml.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)
    }

    /// Inserts a conduit position. Returns whether it was newly inserted;
    /// re-adding a present position is a no-op that does not set the dirty
    /// flag.
    pub fn add(&self, world: WorldId, pos: BlockPos) -> bool {
        let mut inner = self.lock();
        let added = inner.worlds.entry(world).or_default().insert(pos);
        if added {
            inner.mark_dirty();
        }
        added
    }

    /// Removes a conduit position. Returns whether it was present; removing
    /// an absent position is a no-op that does not set the dirty flag. A
    /// world whose set becomes empty is pruned.
    pub fn remove(&self, world: WorldId, pos: BlockPos) -> bool {
        let mut inner = self.lock();
        let removed = match inner.worlds.get_mut(&world) {
            Some(conduits) => {
                let removed = conduits.remove(&pos);
                if removed && conduits.is_empty() {
                    inner.worlds.remove(&world);
                }
                removed
            }
            None => false,
        };
        if removed {
            inner.mark_dirty();
        }
        removed
    }

    /// Membership test with no side effects.
    pub fn contains(&self, world: WorldId, pos: BlockPos) -> bool {
        self.lock()
            .worlds
            .get(&world)
            .is_some_and(|conduits| conduits.contains(&pos))
    }

    /// Calls `visitor` for every `(world, position)` pair in the store.
    /// Traversal order is unspecified. The store lock is held for the
    /// duration of the traversal, so the visitor must not call back into
    /// the store.
    pub fn for_each<F: FnMut(WorldId, BlockPos)>(&self, mut visitor: F) {
        for (&world, conduits) in self.lock().worlds.iter() {
            for &pos in conduits.iter() {
                visitor(world, pos);
            }
        }
    }

    /// Calls `visitor` for every position in one world. A world unknown to
    /// the store yields no calls.
    pub fn for_each_world<F: FnMut(BlockPos)>(&self, world: WorldId, mut visitor: F) {
        if let Some(conduits) = self.lock().worlds.get(&world) {
            for &pos in conduits.iter() {
                visitor(pos);
            }
        }
    }

    /// Returns true iff the in-memory state has diverged from the on-disk
    /// state since the last successful save.
    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    fn lock(&self) -> MutexGuard<Inner> {
        // A poisoning panic cannot leave Inner structurally inconsistent;
        // every mutation completes before the guard is dropped.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Deterministic serialization form: worlds and positions both sorted, so
/// saves of identical state produce identical bytes.
fn serialize(worlds: &AHashMap<WorldId, AHashSet<BlockPos>>) -> BTreeMap<String, Vec<String>> {
    worlds
        .iter()
        .map(|(world, conduits)| {
            let mut positions: Vec<String> = conduits.iter().map(ToString::to_string).collect();
            positions.sort();
            (world.to_string(), positions)
        })
        .collect()
}

#[derive(Error, Debug)]
pub enum StoreLoadingError {
    #[error(transparent)]
    Io { source: io::Error },
    #[error("conduit data file YAML parsing error")]
    YamlParsing { source: serde_yaml::Error },
}

#[derive(Error, Debug)]
pub enum StoreStoringError {
    #[error(transparent)]
    Io { source: io::Error },
    #[error("conduit data file YAML serialization error")]
    YamlSerialization { source: serde_yaml::Error },
}
