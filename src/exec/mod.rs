// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `CommandRunner` trait the job pipeline talks
//!   to, which tests can replace with a recording fake.
//! - [`process`] is the production runner on top of `tokio::process`.
//! - [`stream`] drains a child's stdout and stderr concurrently.
//! - [`dispatch`] maps a job strategy onto a command line or custom action.
//! - [`shell`] holds the quoting helpers used to build command lines.

pub mod backend;
pub mod dispatch;
pub mod process;
pub mod shell;
pub mod stream;

pub use backend::CommandRunner;
pub use dispatch::{dispatch, DispatchOutcome, DispatchPlan};
pub use process::ProcessRunner;
