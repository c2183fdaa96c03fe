// src/engine/mod.rs

//! Orchestration engine for batchup.
//!
//! - [`core`] is the pure job state machine (no IO).
//! - [`executor`] drives one job through the states and is the failure
//!   boundary for that job.
//! - [`batch`] runs the jobs of a batch one after another.
//! - [`condition`] evaluates job conditions.

use std::path::PathBuf;

use crate::backup::RotationReport;
use crate::types::CommandStatus;

pub mod batch;
pub mod condition;
pub mod core;
pub mod executor;

pub use batch::BatchRunner;
pub use core::{JobState, StepResult};
pub use executor::{ExecutorOptions, JobExecutor};

/// How a job ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Done,
    /// The job's condition did not hold. Not a failure.
    Skipped,
    Aborted { reason: String },
}

/// Everything the batch learns about one job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub name: String,
    pub outcome: JobOutcome,
    /// States entered, in order, ending with the terminal state. Kept even
    /// when the job panics.
    pub visited: Vec<JobState>,
    /// Artifact path the strategy was asked to produce, once dispatch ran.
    pub artifact: Option<PathBuf>,
    /// Exit status of the backup command, when the strategy ran one. A
    /// failure here does not abort the job.
    pub dispatch_status: Option<CommandStatus>,
    pub rotation: Option<RotationReport>,
}

impl JobReport {
    pub fn is_aborted(&self) -> bool {
        matches!(self.outcome, JobOutcome::Aborted { .. })
    }

    pub fn reached(&self, state: JobState) -> bool {
        self.visited.contains(&state)
    }
}

/// Per-job results of a whole run, in batch order.
///
/// A finished batch is not by itself a success signal; look at the jobs.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub jobs: Vec<JobReport>,
}

impl BatchReport {
    /// True when no job was aborted. Skipped jobs count as fine.
    pub fn all_ok(&self) -> bool {
        !self.jobs.iter().any(JobReport::is_aborted)
    }

    pub fn count(&self, pred: impl Fn(&JobOutcome) -> bool) -> usize {
        self.jobs.iter().filter(|j| pred(&j.outcome)).count()
    }

    pub fn aborted(&self) -> impl Iterator<Item = &JobReport> {
        self.jobs.iter().filter(|j| j.is_aborted())
    }

    pub fn get(&self, name: &str) -> Option<&JobReport> {
        self.jobs.iter().find(|j| j.name == name)
    }
}
