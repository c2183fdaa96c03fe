// src/backup/mod.rs

//! Filesystem-facing pieces of a backup job: where the artifact goes,
//! whether source and target are usable, and pruning old artifacts.

pub mod artifact;
pub mod retention;
pub mod validate;

pub use artifact::{artifact_base, timestamp};
pub use retention::{rotate, RotationReport};
pub use validate::{validate_source, validate_target};
