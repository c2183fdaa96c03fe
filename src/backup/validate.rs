// src/backup/validate.rs

//! Pre-flight checks on a job's source and target.
//!
//! Both checks report problems on the console and answer with a plain
//! `bool`; the executor turns `false` into an aborted job.

use std::path::Path;

use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::output::Console;

/// Make sure `dir` is a usable target directory, creating it (and its
/// parents) when missing.
pub fn validate_target(fs: &dyn FileSystem, console: &dyn Console, dir: &Path) -> bool {
    if !fs.exists(dir) {
        if let Err(err) = fs.create_dir_all(dir) {
            console.line(&format!("Could not create directory {}.", dir.display()));
            console.line(&format!("{err:#}"));
            warn!(target_dir = %dir.display(), error = %err, "could not create target");
            return false;
        }
        debug!(target_dir = %dir.display(), "created target directory");
    }

    if !fs.is_dir(dir) {
        console.line(&format!("Target {} is not a directory.", dir.display()));
        warn!(target_dir = %dir.display(), "target is not a directory");
        return false;
    }

    true
}

/// Make sure `path` exists (file or directory).
pub fn validate_source(fs: &dyn FileSystem, console: &dyn Console, path: &Path) -> bool {
    if !fs.exists(path) {
        console.line(&format!("Source {} doesn't exist.", path.display()));
        warn!(source = %path.display(), "source does not exist");
        return false;
    }
    true
}
