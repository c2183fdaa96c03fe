// src/engine/batch.rs

use tracing::{info, warn};

use crate::job::Batch;

use super::{BatchReport, JobExecutor, JobOutcome};

/// Runs every job of a batch, in order, one at a time.
///
/// Jobs never overlap: their output would interleave and they may share
/// target disks. A job that aborts does not stop the ones after it.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    executor: JobExecutor,
}

impl BatchRunner {
    pub fn new(executor: JobExecutor) -> Self {
        Self { executor }
    }

    pub async fn run(&self, batch: &Batch) -> BatchReport {
        info!(jobs = batch.len(), "batch started");

        let mut report = BatchReport::default();
        for job in batch {
            let job_report = self.executor.execute(job).await;
            report.jobs.push(job_report);
        }

        let done = report.count(|o| matches!(o, JobOutcome::Done));
        let skipped = report.count(|o| matches!(o, JobOutcome::Skipped));
        let aborted = report.count(|o| matches!(o, JobOutcome::Aborted { .. }));
        if aborted > 0 {
            let names: Vec<_> = report.aborted().map(|j| j.name.as_str()).collect();
            warn!(done, skipped, aborted, ?names, "batch finished with aborted jobs");
        } else {
            info!(done, skipped, "batch finished");
        }

        report
    }
}
