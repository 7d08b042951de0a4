//! This crate implements chunk partitioning of conduit positions for fast
//! proximity lookup.
//!
//! The core structure is a per-world map from chunk keys to the conduits
//! located in that chunk. A proximity query scans only the square of chunks
//! around the query point instead of every registered conduit.

mod index;
mod range;

pub use index::{ConduitIndex, PreciseCutoff};
