//! This module implements the final (i.e. parsed and validated)
//! configuration objects and their building from persistent configuration.

use std::time::Duration;

use ahash::AHashSet;
use anyhow::{ensure, Error, Result};
use cw_guard::ProximityPolicy;
use cw_index::PreciseCutoff;
use cw_types::SpawnReason;

use crate::persisted;

/// Largest accepted chunk scan radius; a 33×33 chunk square per query is
/// already far beyond any sensible deployment.
const MAX_CHUNK_RADIUS: i64 = 16;

const DEFAULT_CHUNK_RADIUS: u32 = 2;
const DEFAULT_CUTOFF_DISTANCE: u32 = 32;
const DEFAULT_VERTICAL_TOLERANCE: u32 = 12;
const DEFAULT_AUTOSAVE_PERIOD: Duration = Duration::from_secs(300);

/// Validated ConduitWard configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    policy: ProximityPolicy,
    autosave_period: Duration,
    debug: bool,
}

impl Configuration {
    /// Proximity parameters applied to every spawn decision.
    pub fn policy(&self) -> &ProximityPolicy {
        &self.policy
    }

    /// Cadence at which the host should invoke the periodic save. The core
    /// only exposes the value; scheduling is the host's concern.
    pub fn autosave_period(&self) -> Duration {
        self.autosave_period
    }

    /// Whether per-decision diagnostic logging is enabled.
    pub fn debug(&self) -> bool {
        self.debug
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            policy: ProximityPolicy::default(),
            autosave_period: DEFAULT_AUTOSAVE_PERIOD,
            debug: false,
        }
    }
}

impl TryFrom<persisted::Configuration> for Configuration {
    type Error = Error;

    fn try_from(conf: persisted::Configuration) -> Result<Self> {
        let proximity = conf.proximity.unwrap_or_default();

        let chunk_radius = match proximity.chunk_check_radius {
            Some(radius) => {
                ensure!(radius >= 0, "`chunk-check-radius` must not be negative.");
                ensure!(
                    radius <= MAX_CHUNK_RADIUS,
                    "`chunk-check-radius` must be smaller or equal to {MAX_CHUNK_RADIUS}."
                );
                radius as u32
            }
            None => DEFAULT_CHUNK_RADIUS,
        };

        let precise = match proximity.precise {
            Some(precise) => {
                let distance = match precise.cutoff_distance {
                    Some(distance) => {
                        ensure!(distance > 0, "`cutoff-distance` must be positive.");
                        ensure!(
                            distance <= i64::from(u32::MAX),
                            "`cutoff-distance` is too large."
                        );
                        distance as u32
                    }
                    None => DEFAULT_CUTOFF_DISTANCE,
                };
                let vertical_tolerance = match precise.vertical_tolerance {
                    Some(tolerance) => {
                        ensure!(
                            tolerance >= 0,
                            "`vertical-tolerance` must not be negative."
                        );
                        ensure!(
                            tolerance <= i64::from(u32::MAX),
                            "`vertical-tolerance` is too large."
                        );
                        tolerance as u32
                    }
                    None => DEFAULT_VERTICAL_TOLERANCE,
                };
                Some(PreciseCutoff::new(distance, vertical_tolerance))
            }
            None => None,
        };

        let guarded_reasons: AHashSet<SpawnReason> = match conf.guarded_spawn_reasons {
            Some(reasons) => reasons.into_iter().collect(),
            None => AHashSet::from_iter([SpawnReason::Natural, SpawnReason::Reinforcements]),
        };

        let autosave_period = match conf.storage.unwrap_or_default().autosave_seconds {
            Some(seconds) => {
                ensure!(seconds > 0, "`autosave-seconds` must be positive.");
                Duration::from_secs(seconds as u64)
            }
            None => DEFAULT_AUTOSAVE_PERIOD,
        };

        Ok(Self {
            policy: ProximityPolicy::new(chunk_radius, precise, guarded_reasons),
            autosave_period,
            debug: conf.debug.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Configuration> {
        let persistent: persisted::Configuration = serde_yaml::from_str(text)?;
        Configuration::try_from(persistent)
    }

    #[test]
    fn test_defaults() {
        let conf = Configuration::try_from(persisted::Configuration::default()).unwrap();

        assert_eq!(conf.policy().chunk_radius(), 2);
        assert_eq!(conf.policy().precise(), None);
        assert_eq!(conf.autosave_period(), Duration::from_secs(300));
        assert!(!conf.debug());
    }

    #[test]
    fn test_full_configuration() {
        let conf = parse(
            r#"
proximity:
  chunk-check-radius: 4
  precise:
    cutoff-distance: 48
    vertical-tolerance: 6
storage:
  autosave-seconds: 60
guarded-spawn-reasons: [natural, chunk-generation]
debug: true
"#,
        )
        .unwrap();

        assert_eq!(conf.policy().chunk_radius(), 4);
        assert_eq!(conf.policy().precise(), Some(PreciseCutoff::new(48, 6)));
        assert_eq!(conf.autosave_period(), Duration::from_secs(60));
        assert!(conf.debug());
    }

    #[test]
    fn test_precise_defaults() {
        let conf = parse("proximity:\n  precise: {}\n").unwrap();
        assert_eq!(conf.policy().precise(), Some(PreciseCutoff::new(32, 12)));
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        assert!(parse("proximity:\n  chunk-check-radius: -1\n").is_err());
        assert!(parse("proximity:\n  chunk-check-radius: 17\n").is_err());
        assert!(parse("proximity:\n  precise:\n    cutoff-distance: 0\n").is_err());
        assert!(parse("proximity:\n  precise:\n    vertical-tolerance: -3\n").is_err());
        assert!(parse("storage:\n  autosave-seconds: 0\n").is_err());
    }
}
