// src/engine/executor.rs

//! Runs one job through its pipeline and contains every failure inside it.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use crate::action::ActionContext;
use crate::backup::{artifact_base, rotate, timestamp, validate_source, validate_target};
use crate::clock::{Clock, SystemClock};
use crate::errors::Result;
use crate::exec::dispatch::{archive_path, dispatch, DispatchOutcome};
use crate::exec::shell::quote_path;
use crate::exec::{CommandRunner, ProcessRunner};
use crate::fs::{FileSystem, RealFileSystem};
use crate::job::Job;
use crate::output::{Console, StdoutConsole};
use crate::types::{CommandStatus, Hook, Strategy};

use super::condition::condition_holds;
use super::core::{transition, JobState, StepResult};
use super::{JobOutcome, JobReport};

/// Width of the `=====` banner printed before each job.
pub const BANNER_WIDTH: usize = 80;

/// Knobs shared by every job of a run.
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Command used to list the target directory at the end of a job. The
    /// quoted target path is appended.
    pub list_command: String,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            list_command: "ls -alh".to_string(),
        }
    }
}

struct Inner {
    runner: Arc<dyn CommandRunner>,
    fs: Arc<dyn FileSystem>,
    console: Arc<dyn Console>,
    clock: Arc<dyn Clock>,
    options: ExecutorOptions,
}

/// Drives one [`Job`] from `Start` to `Done`, `Skipped` or `Aborted`.
///
/// Cloning is cheap; clones share their collaborators.
#[derive(Clone)]
pub struct JobExecutor {
    inner: Arc<Inner>,
}

impl fmt::Debug for JobExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobExecutor")
            .field("fs", &self.inner.fs)
            .field("console", &self.inner.console)
            .field("clock", &self.inner.clock)
            .field("options", &self.inner.options)
            .finish_non_exhaustive()
    }
}

/// States entered by a job. Shared with the caller so the trail survives a
/// panic inside the job's task.
type Visited = Arc<Mutex<Vec<JobState>>>;

/// Per-job scratch state, carried out of the pipeline when it returns.
#[derive(Debug)]
struct JobRun {
    base: PathBuf,
    visited: Visited,
    artifact: Option<PathBuf>,
    dispatch_status: Option<CommandStatus>,
    rotation: Option<crate::backup::RotationReport>,
    abort_reason: Option<String>,
}

impl JobExecutor {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        fs: Arc<dyn FileSystem>,
        console: Arc<dyn Console>,
        clock: Arc<dyn Clock>,
        options: ExecutorOptions,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                runner,
                fs,
                console,
                clock,
                options,
            }),
        }
    }

    /// Real processes, real filesystem, stdout, local clock.
    pub fn system(options: ExecutorOptions) -> Self {
        let console: Arc<dyn Console> = Arc::new(StdoutConsole);
        let runner = Arc::new(ProcessRunner::new(Arc::clone(&console)));
        Self::new(
            runner,
            Arc::new(RealFileSystem),
            console,
            Arc::new(SystemClock),
            options,
        )
    }

    pub fn console(&self) -> &dyn Console {
        self.inner.console.as_ref()
    }

    fn runner(&self) -> &dyn CommandRunner {
        self.inner.runner.as_ref()
    }

    /// Run `job` to a terminal state.
    ///
    /// This is the failure boundary of a job: errors from any state and
    /// panics (e.g. inside a custom action) end up as
    /// [`JobOutcome::Aborted`] in the returned report, never as an error or
    /// unwinding in the caller.
    pub async fn execute(&self, job: &Job) -> JobReport {
        let console = self.console();
        console.line(&"=".repeat(BANNER_WIDTH));
        console.line(&format!("Backing up {}...", job.name));
        info!(job = %job.name, strategy = %job.strategy, "job started");

        let visited: Visited = Arc::default();
        let this = self.clone();
        let owned = job.clone();
        let trail = Arc::clone(&visited);
        let handle = tokio::spawn(async move {
            let mut run = this.start_run(&owned, trail);
            let result = this.drive(&owned, &mut run).await;
            (run, result)
        });

        let (outcome, run) = match handle.await {
            Ok((run, Ok(terminal))) => (self.finish(job, terminal, &run), Some(run)),
            Ok((run, Err(err))) => {
                let err = anyhow::Error::from(err);
                self.report_failure(job, &format!("{err:?}"));
                let outcome = JobOutcome::Aborted {
                    reason: format!("{err:#}"),
                };
                (outcome, Some(run))
            }
            Err(join_err) => {
                // The payload carries only the message. The panic hook has
                // already written the location (and the backtrace, with
                // RUST_BACKTRACE=1) to stderr.
                let reason = if join_err.is_panic() {
                    format!(
                        "panicked: {} (location and backtrace on stderr; set RUST_BACKTRACE=1)",
                        panic_message(join_err.into_panic())
                    )
                } else {
                    format!("job task failed: {join_err}")
                };
                self.report_failure(job, &reason);
                (JobOutcome::Aborted { reason }, None)
            }
        };

        let mut report = JobReport {
            name: job.name.clone(),
            outcome,
            visited: visited.lock().unwrap_or_else(|e| e.into_inner()).clone(),
            artifact: None,
            dispatch_status: None,
            rotation: None,
        };
        if let Some(run) = run {
            report.artifact = run.artifact;
            report.dispatch_status = run.dispatch_status;
            report.rotation = run.rotation;
        }
        let aborted = matches!(report.outcome, JobOutcome::Aborted { .. });
        if aborted && report.visited.last() != Some(&JobState::Aborted) {
            report.visited.push(JobState::Aborted);
        }

        info!(job = %job.name, outcome = ?report.outcome, "job finished");
        report
    }

    fn start_run(&self, job: &Job, visited: Visited) -> JobRun {
        let stamp = timestamp(&self.inner.clock.now());
        JobRun {
            base: artifact_base(&job.target, &job.source, &stamp),
            visited,
            artifact: None,
            dispatch_status: None,
            rotation: None,
            abort_reason: None,
        }
    }

    async fn drive(&self, job: &Job, run: &mut JobRun) -> Result<JobState> {
        let mut state = JobState::Start;
        run.enter(state);

        while !state.is_terminal() {
            let step = self.step(state, job, run).await?;
            let next = transition(state, &step);
            debug!(job = %job.name, from = ?state, to = ?next, "job state transition");
            if let StepResult::Abort(reason) = step {
                run.abort_reason = Some(reason);
            }
            state = next;
            run.enter(state);
        }

        Ok(state)
    }

    async fn step(&self, state: JobState, job: &Job, run: &mut JobRun) -> Result<StepResult> {
        let fs = self.inner.fs.as_ref();
        let console = self.console();

        match state {
            JobState::ConditionCheck => {
                let Some(condition) = &job.condition else {
                    return Ok(StepResult::Continue);
                };
                let now = self.inner.clock.now();
                if condition_holds(condition, self.runner(), now).await? {
                    Ok(StepResult::Continue)
                } else {
                    console.line("Skipping (conditions not met)");
                    Ok(StepResult::Skip)
                }
            }
            JobState::PreCommand => self.run_hook(job, job.pre.as_ref(), "pre-command", run).await,
            JobState::ValidateTarget => {
                if validate_target(fs, console, &job.target) {
                    Ok(StepResult::Continue)
                } else {
                    Ok(StepResult::Abort(format!(
                        "target {} is not usable",
                        job.target.display()
                    )))
                }
            }
            JobState::ValidateSource => {
                if validate_source(fs, console, &job.source) {
                    Ok(StepResult::Continue)
                } else {
                    Ok(StepResult::Abort(format!(
                        "source {} does not exist",
                        job.source.display()
                    )))
                }
            }
            JobState::Dispatch => self.run_dispatch(job, run).await,
            JobState::PostCommand => {
                self.run_hook(job, job.post.as_ref(), "post-command", run).await
            }
            JobState::Rotate => {
                if let Some(keep) = job.retain {
                    run.rotation = Some(rotate(fs, console, &job.target, keep)?);
                }
                Ok(StepResult::Continue)
            }
            JobState::ListTarget => {
                let line = format!(
                    "{} {}",
                    self.inner.options.list_command,
                    quote_path(&job.target)
                );
                self.runner().run(&line).await?;
                Ok(StepResult::Continue)
            }
            JobState::Start | JobState::Done | JobState::Skipped | JobState::Aborted => {
                Ok(StepResult::Continue)
            }
        }
    }

    async fn run_dispatch(&self, job: &Job, run: &mut JobRun) -> Result<StepResult> {
        let source_is_dir = self.inner.fs.is_dir(&job.source);
        let outcome = dispatch(
            &job.strategy,
            &job.source,
            source_is_dir,
            &run.base,
            self.runner(),
        )
        .await?;

        run.artifact = match job.strategy {
            Strategy::Archive => Some(archive_path(&run.base)),
            Strategy::NoOp => None,
            _ => Some(run.base.clone()),
        };

        match outcome {
            DispatchOutcome::Command(status) => {
                run.dispatch_status = Some(status);
                if !status.success() {
                    // Reported, not fatal: post hooks still have to clean up.
                    warn!(job = %job.name, %status, "backup command failed");
                    self.console()
                        .line(&format!("Backup command failed with {status}."));
                }
                Ok(StepResult::Continue)
            }
            DispatchOutcome::Skipped => {
                debug!(job = %job.name, "strategy is a no-op; nothing dispatched");
                Ok(StepResult::Continue)
            }
            DispatchOutcome::Custom => Ok(StepResult::Continue),
        }
    }

    async fn run_hook(
        &self,
        job: &Job,
        hook: Option<&Hook>,
        label: &str,
        run: &JobRun,
    ) -> Result<StepResult> {
        let Some(hook) = hook else {
            return Ok(StepResult::Continue);
        };

        match hook {
            Hook::Command(cmd) => {
                let status = self.runner().run(cmd).await?;
                if !status.success() {
                    warn!(job = %job.name, hook = label, %status, "hook command failed");
                    if job.abort_on_hook_failure {
                        self.console()
                            .line(&format!("The {label} failed with {status}."));
                        return Ok(StepResult::Abort(format!("{label} failed with {status}")));
                    }
                }
                Ok(StepResult::Continue)
            }
            Hook::Custom(action) => {
                action
                    .invoke(ActionContext {
                        source: &job.source,
                        target: &run.base,
                        runner: self.runner(),
                    })
                    .await?;
                Ok(StepResult::Continue)
            }
        }
    }

    fn finish(&self, job: &Job, terminal: JobState, run: &JobRun) -> JobOutcome {
        let console = self.console();
        match terminal {
            JobState::Skipped => JobOutcome::Skipped,
            JobState::Aborted => {
                console.line("Aborting.");
                let reason = run
                    .abort_reason
                    .clone()
                    .unwrap_or_else(|| "aborted".to_string());
                error!(job = %job.name, %reason, "job aborted");
                JobOutcome::Aborted { reason }
            }
            _ => {
                console.line(&format!("Done with {}.", job.name));
                console.line("");
                JobOutcome::Done
            }
        }
    }

    fn report_failure(&self, job: &Job, detail: &str) {
        let console = self.console();
        console.line(&format!("Error while backing up {}:", job.name));
        console.line(detail);
        console.line("Aborting.");
        error!(job = %job.name, error = %detail, "job failed");
    }
}

impl JobRun {
    fn enter(&self, state: JobState) {
        self.visited
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(state);
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
