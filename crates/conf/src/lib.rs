//! This crate implements functionality around ConduitWard configuration:
//!
//! * Loading of the configuration from a YAML file, with defaults when the
//!   file is absent.
//!
//! * Parsing, validation and configuration provisioning.

mod conf;
mod io;
mod persisted;

pub use conf::Configuration;
pub use io::load_conf;
