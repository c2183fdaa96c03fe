// src/exec/dispatch.rs

//! Turning a job's [`Strategy`] into work.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::action::{Action, ActionContext};
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::exec::shell::{quote_path, quote_str};
use crate::types::{CommandStatus, Strategy};

/// Extension appended to the artifact base by [`Strategy::Archive`].
pub const ARCHIVE_EXTENSION: &str = "tgz";

/// What a strategy boils down to for one `(source, base)` pair.
#[derive(Debug)]
pub enum DispatchPlan<'a> {
    /// Run this shell command line.
    Shell(String),
    /// Hand over to the custom action.
    Custom(&'a Action),
    /// Nothing to do.
    Skip,
}

/// What actually happened during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Command(CommandStatus),
    Custom,
    Skipped,
}

/// `<base>.tgz`
pub fn archive_path(base: &Path) -> PathBuf {
    let mut s: OsString = base.as_os_str().to_owned();
    s.push(".");
    s.push(ARCHIVE_EXTENSION);
    PathBuf::from(s)
}

/// Work out what `strategy` would do. Pure; nothing is run.
///
/// `source_is_dir` only matters for `Mirror`, where a directory source gets
/// a trailing slash so `base` becomes the mirror itself rather than a
/// directory containing it.
pub fn plan<'a>(
    strategy: &'a Strategy,
    source: &Path,
    source_is_dir: bool,
    base: &Path,
) -> DispatchPlan<'a> {
    match strategy {
        Strategy::Archive => DispatchPlan::Shell(archive_command(source, base)),
        Strategy::Mirror => {
            let from = if source_is_dir {
                let trimmed = source.to_string_lossy();
                let trimmed = trimmed.trim_end_matches('/');
                quote_str(&format!("{trimmed}/"))
            } else {
                quote_path(source)
            };
            DispatchPlan::Shell(format!("rsync -a {} {}", from, quote_path(base)))
        }
        Strategy::Copy => DispatchPlan::Shell(format!(
            "cp -rf {} {}",
            quote_path(source),
            quote_path(base)
        )),
        Strategy::Custom(action) => DispatchPlan::Custom(action),
        Strategy::NoOp => DispatchPlan::Skip,
    }
}

fn archive_command(source: &Path, base: &Path) -> String {
    let archive = quote_path(&archive_path(base));
    match source.file_name() {
        Some(name) => {
            let parent = match source.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            format!(
                "tar czpf {} -C {} {}",
                archive,
                quote_path(parent),
                quote_path(Path::new(name))
            )
        }
        // `/`, `..` and friends: archive the path as given.
        None => format!("tar czpf {} {}", archive, quote_path(source)),
    }
}

/// Run the strategy for one job.
pub async fn dispatch(
    strategy: &Strategy,
    source: &Path,
    source_is_dir: bool,
    base: &Path,
    runner: &dyn CommandRunner,
) -> Result<DispatchOutcome> {
    match plan(strategy, source, source_is_dir, base) {
        DispatchPlan::Shell(line) => {
            let status = runner.run(&line).await?;
            Ok(DispatchOutcome::Command(status))
        }
        DispatchPlan::Custom(action) => {
            action
                .invoke(ActionContext {
                    source,
                    target: base,
                    runner,
                })
                .await?;
            Ok(DispatchOutcome::Custom)
        }
        DispatchPlan::Skip => Ok(DispatchOutcome::Skipped),
    }
}
