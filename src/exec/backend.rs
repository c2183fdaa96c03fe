// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The job pipeline talks to a `CommandRunner` instead of spawning processes
//! itself. Production uses [`ProcessRunner`](super::process::ProcessRunner);
//! tests can provide a runner that only records the command lines it was
//! asked to run.

use crate::errors::Result;
use crate::types::{BoxFuture, CommandStatus};

/// Trait abstracting "run this shell command line to completion".
pub trait CommandRunner: Send + Sync {
    /// Announce and run `command_line`, streaming its output to the console,
    /// and resolve once it has exited.
    ///
    /// A non-zero exit is reported through the returned [`CommandStatus`],
    /// not as an error. Errors mean the command could not be run at all.
    fn run<'a>(&'a self, command_line: &'a str) -> BoxFuture<'a, Result<CommandStatus>>;
}
