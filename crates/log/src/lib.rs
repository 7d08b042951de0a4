//! Logging setup for hosts embedding ConduitWard.

mod setup;

pub use setup::{setup, LogGuard};
