//! This crate implements the authoritative persistent set of conduit
//! positions: a YAML-backed, dirty-flag-batched store of `(world, position)`
//! pairs. It has no knowledge of spatial indexing.

mod store;

pub use store::{ConduitStore, StoreLoadingError, StoreStoringError};
