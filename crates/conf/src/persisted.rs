//! This module contains configuration objects which can be deserialized
//! from a configuration file. It does not contain the final configuration
//! object which must be built and validated from the objects here.

use cw_types::SpawnReason;
use serde::Deserialize;

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(super) struct Configuration {
    pub(super) proximity: Option<Proximity>,
    pub(super) storage: Option<Storage>,
    pub(super) guarded_spawn_reasons: Option<Vec<SpawnReason>>,
    pub(super) debug: Option<bool>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(super) struct Proximity {
    pub(super) chunk_check_radius: Option<i64>,
    pub(super) precise: Option<Precise>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(super) struct Precise {
    pub(super) cutoff_distance: Option<i64>,
    pub(super) vertical_tolerance: Option<i64>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub(super) struct Storage {
    pub(super) autosave_seconds: Option<i64>,
}
