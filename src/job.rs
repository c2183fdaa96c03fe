// src/job.rs

//! Jobs and batches: the input of a run.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::errors::{BatchupError, Result};
use crate::types::{Condition, Hook, Strategy};

/// One named backup job. Immutable once a run starts.
#[derive(Debug, Clone)]
pub struct Job {
    /// Display name; unique within a batch.
    pub name: String,
    pub strategy: Strategy,
    /// File or directory to back up.
    pub source: PathBuf,
    /// Directory receiving the artifacts.
    pub target: PathBuf,
    /// Keep this many newest entries in `target`; `None` disables rotation.
    pub retain: Option<usize>,
    pub pre: Option<Hook>,
    pub post: Option<Hook>,
    /// `None` means "always run".
    pub condition: Option<Condition>,
    /// Abort the job when a pre/post command exits non-zero. Off by default:
    /// hook exit codes are otherwise only visible in the streamed output.
    pub abort_on_hook_failure: bool,
}

impl Job {
    pub fn new(
        name: impl Into<String>,
        strategy: Strategy,
        source: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            strategy,
            source: source.into(),
            target: target.into(),
            retain: None,
            pre: None,
            post: None,
            condition: None,
            abort_on_hook_failure: false,
        }
    }

    pub fn retain(mut self, keep: usize) -> Self {
        self.retain = Some(keep);
        self
    }

    pub fn pre(mut self, hook: impl Into<Hook>) -> Self {
        self.pre = Some(hook.into());
        self
    }

    pub fn post(mut self, hook: impl Into<Hook>) -> Self {
        self.post = Some(hook.into());
        self
    }

    pub fn when(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn abort_on_hook_failure(mut self, on: bool) -> Self {
        self.abort_on_hook_failure = on;
        self
    }

    /// Check the static invariants of a single job.
    pub fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BatchupError::ConfigError(
                "job name must not be empty".to_string(),
            ));
        }
        if self.source.as_os_str().is_empty() {
            return Err(BatchupError::ConfigError(format!(
                "job '{}' has an empty source",
                self.name
            )));
        }
        if self.target.as_os_str().is_empty() {
            return Err(BatchupError::ConfigError(format!(
                "job '{}' has an empty target",
                self.name
            )));
        }
        Ok(())
    }
}

/// Ordered set of jobs; the order is the execution order.
#[derive(Debug, Clone, Default)]
pub struct Batch {
    jobs: Vec<Job>,
}

impl Batch {
    /// Build a batch, checking every job and rejecting duplicate names.
    pub fn new(jobs: Vec<Job>) -> Result<Self> {
        let mut seen = HashSet::new();
        for job in &jobs {
            job.check()?;
            if !seen.insert(job.name.as_str()) {
                return Err(BatchupError::ConfigError(format!(
                    "duplicate job name '{}'",
                    job.name
                )));
            }
        }
        Ok(Self { jobs })
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.jobs.iter()
    }

    /// Keep only the named jobs, in batch order. Every name must exist.
    pub fn select(&self, names: &[String]) -> Result<Batch> {
        for name in names {
            if !self.jobs.iter().any(|j| &j.name == name) {
                return Err(BatchupError::JobNotFound(name.clone()));
            }
        }
        let jobs = self
            .jobs
            .iter()
            .filter(|j| names.contains(&j.name))
            .cloned()
            .collect();
        Ok(Batch { jobs })
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str) -> Job {
        Job::new(name, Strategy::Copy, "/src", "/dst")
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Batch::new(vec![job("a"), job("b"), job("a")]).unwrap_err();
        assert!(matches!(err, BatchupError::ConfigError(msg) if msg.contains("duplicate job name 'a'")));
    }

    #[test]
    fn empty_paths_are_rejected() {
        let err = Batch::new(vec![Job::new("x", Strategy::Copy, "", "/dst")]).unwrap_err();
        assert!(matches!(err, BatchupError::ConfigError(msg) if msg.contains("empty source")));
    }

    #[test]
    fn select_keeps_batch_order() {
        let batch = Batch::new(vec![job("a"), job("b"), job("c")]).unwrap();
        let picked = batch
            .select(&["c".to_string(), "a".to_string()])
            .unwrap();
        let names: Vec<_> = picked.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn select_unknown_name_fails() {
        let batch = Batch::new(vec![job("a")]).unwrap();
        assert!(matches!(
            batch.select(&["zzz".to_string()]),
            Err(BatchupError::JobNotFound(name)) if name == "zzz"
        ));
    }
}
