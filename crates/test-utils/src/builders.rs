#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};

use batchup::clock::FixedClock;
use batchup::engine::{BatchReport, BatchRunner, ExecutorOptions, JobExecutor};
use batchup::fs::mock::MockFileSystem;
use batchup::job::{Batch, Job};
use batchup::output::MemoryConsole;

use crate::fake_runner::FakeRunner;

/// Local time at the given minute. Panics on nonexistent local times.
pub fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("unambiguous local time")
}

/// Everything a job executor talks to, faked and inspectable.
///
/// `fs` starts with `/src/data` (a directory) and `/backups` present.
pub struct Harness {
    pub fs: MockFileSystem,
    pub console: MemoryConsole,
    pub runner: FakeRunner,
    pub clock: FixedClock,
    pub options: ExecutorOptions,
}

impl Harness {
    pub fn new() -> Self {
        let fs = MockFileSystem::new();
        fs.add_dir("/src/data", std::time::SystemTime::UNIX_EPOCH);
        fs.add_dir("/backups", std::time::SystemTime::UNIX_EPOCH);

        let console = MemoryConsole::new();
        Self {
            fs,
            runner: FakeRunner::new(console.clone()),
            console,
            // A Friday.
            clock: FixedClock(local(2012, 3, 16, 3, 0)),
            options: ExecutorOptions::default(),
        }
    }

    pub fn with_runner(mut self, f: impl FnOnce(FakeRunner) -> FakeRunner) -> Self {
        self.runner = f(self.runner);
        self
    }

    pub fn at(mut self, now: DateTime<Local>) -> Self {
        self.clock = FixedClock(now);
        self
    }

    pub fn executor(&self) -> JobExecutor {
        JobExecutor::new(
            Arc::new(self.runner.clone()),
            Arc::new(self.fs.clone()),
            Arc::new(self.console.clone()),
            Arc::new(self.clock),
            self.options.clone(),
        )
    }

    pub async fn run(&self, jobs: Vec<Job>) -> BatchReport {
        let batch = Batch::new(jobs).expect("valid batch");
        BatchRunner::new(self.executor()).run(&batch).await
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a small source tree under `root`:
///
/// ```text
/// root/one/a.txt
/// root/one/b.txt
/// root/one/c.txt
/// root/two.txt
/// ```
///
/// Returns the paths of `root/one` and `root/two.txt`.
pub fn source_tree(root: &Path) -> (PathBuf, PathBuf) {
    let one = root.join("one");
    fs::create_dir_all(&one).expect("create source dir");
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(one.join(name), format!("contents of {name}\n")).expect("write source file");
    }
    let two = root.join("two.txt");
    fs::write(&two, "second source\n").expect("write source file");
    (one, two)
}
