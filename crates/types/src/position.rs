//! Block positions and the chunk partitioning derived from them.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Position of a single block in a world.
///
/// Positions are plain values: two positions are equal iff all three
/// coordinates are equal, independently of which collection holds them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockPos {
    x: i32,
    y: i32,
    z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn x(&self) -> i32 {
        self.x
    }

    pub const fn y(&self) -> i32 {
        self.y
    }

    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the key of the chunk containing this position.
    pub const fn chunk_key(&self) -> ChunkKey {
        ChunkKey::new(self.chunk_x(), self.chunk_z())
    }

    /// X coordinate of the containing chunk.
    ///
    /// The arithmetic shift implements floor division by 16, so negative
    /// block coordinates round toward negative infinity.
    pub const fn chunk_x(&self) -> i32 {
        self.x >> 4
    }

    /// Z coordinate of the containing chunk. See [`Self::chunk_x`].
    pub const fn chunk_z(&self) -> i32 {
        self.z >> 4
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

impl FromStr for BlockPos {
    type Err = InvalidPosition;

    /// Parses the `"x,y,z"` form used by the conduit data file. Whitespace
    /// around individual coordinates is accepted.
    fn from_str(s: &str) -> Result<Self, InvalidPosition> {
        let mut parts = s.split(',');
        let mut next = || {
            parts
                .next()
                .and_then(|part| part.trim().parse::<i32>().ok())
                .ok_or_else(|| InvalidPosition(s.to_owned()))
        };

        let (x, y, z) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(InvalidPosition(s.to_owned()));
        }
        Ok(Self::new(x, y, z))
    }
}

#[derive(Error, Debug)]
#[error("invalid block position: {0:?}")]
pub struct InvalidPosition(String);

/// Packed identifier of a single chunk: chunk X in the high 32 bits, chunk
/// Z in the low 32 bits.
///
/// Two positions map to the same key iff they fall into the same 16×16
/// horizontal cell, regardless of their Y coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkKey(i64);

impl ChunkKey {
    pub const fn new(chunk_x: i32, chunk_z: i32) -> Self {
        Self(((chunk_x as i64) << 32) | ((chunk_z as i64) & 0xffff_ffff))
    }
}
