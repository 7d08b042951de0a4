//! Opaque world identifiers.

use std::{fmt, str::FromStr};

use uuid::Uuid;

/// Identifier of a single world.
///
/// Worlds are independent namespaces: conduits in different worlds never
/// interact. The identifier is compared by value and rendered in the
/// hyphenated UUID textual form in the conduit data file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldId(Uuid);

impl WorldId {
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<Uuid> for WorldId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for WorldId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, uuid::Error> {
        s.parse().map(Self)
    }
}
