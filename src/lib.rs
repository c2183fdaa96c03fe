// src/lib.rs

pub mod action;
pub mod backup;
pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod job;
pub mod logging;
pub mod output;
pub mod types;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{default_config_path, load_and_validate, ConfigFile};
use crate::engine::{BatchReport, BatchRunner, JobExecutor};
use crate::exec::dispatch::{plan, DispatchPlan};
use crate::job::Batch;

pub use crate::action::{Action, ActionContext, CustomAction};
pub use crate::job::Job;
pub use crate::types::{Condition, Hook, Strategy};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading and validation
/// - optional `--job` selection
/// - the executor over real processes, filesystem and stdout
/// - the batch runner
///
/// Individual job failures are part of the returned report, not errors.
pub async fn run(args: CliArgs) -> Result<BatchReport> {
    let config_path = default_config_path(args.config.as_deref());
    info!(config = %config_path.display(), "loading job file");
    let cfg = load_and_validate(&config_path)?;

    let batch = if args.jobs.is_empty() {
        cfg.batch.clone()
    } else {
        cfg.batch.select(&args.jobs)?
    };

    if args.dry_run {
        print_dry_run(&cfg, &batch);
        return Ok(BatchReport::default());
    }

    let executor = JobExecutor::system(cfg.settings.executor_options());
    let report = BatchRunner::new(executor).run(&batch).await;
    Ok(report)
}

/// Print each job and what its strategy would run. Nothing is executed and
/// the source is not inspected, so `Mirror` is shown as for a directory.
fn print_dry_run(cfg: &ConfigFile, batch: &Batch) {
    println!("batchup dry-run");
    println!("  settings.list_command = {}", cfg.settings.list_command);
    println!();

    println!("jobs ({}):", batch.len());
    for job in batch {
        println!("  - {}", job.name);
        println!("      strategy: {}", job.strategy);
        println!("      source: {}", job.source.display());
        println!("      target: {}", job.target.display());
        if let Some(keep) = job.retain {
            println!("      retain: {keep}");
        }
        if let Some(condition) = &job.condition {
            println!("      when: {condition:?}");
        }
        if let Some(Hook::Command(cmd)) = &job.pre {
            println!("      pre: {cmd}");
        }
        let base = backup::artifact_base(&job.target, &job.source, "<timestamp>");
        match plan(&job.strategy, &job.source, true, &base) {
            DispatchPlan::Shell(line) => println!("      runs: {line}"),
            DispatchPlan::Custom(_) => println!("      runs: custom action"),
            DispatchPlan::Skip => println!("      runs: nothing"),
        }
        if let Some(Hook::Command(cmd)) = &job.post {
            println!("      post: {cmd}");
        }
        if job.abort_on_hook_failure {
            println!("      abort_on_hook_failure: true");
        }
    }

    debug!("dry-run complete (no execution)");
}
