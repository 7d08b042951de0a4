//! This crate implements value types shared across ConduitWard crates.
//!
//! It is lightweight and without any host or I/O dependency so it can be
//! used from host adapters as well as from the core crates.

pub mod position;
pub mod spawn;
pub mod world;

pub use position::{BlockPos, ChunkKey, InvalidPosition};
pub use spawn::SpawnReason;
pub use world::WorldId;
