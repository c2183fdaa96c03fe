// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::engine::ExecutorOptions;
use crate::job::Batch;

/// Job file as read from TOML, before validation.
///
/// ```toml
/// [settings]
/// list_command = "ls -alh"
///
/// [[job]]
/// name = "redmine"
/// strategy = "archive"
/// source = "/srv/redmine"
/// target = "/mnt/backup/redmine"
/// retain = 10
///
/// [job.when]
/// weekdays = ["tue"]
/// ```
///
/// Jobs are an array of tables so the file order is the run order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub settings: SettingsSection,

    #[serde(default, rename = "job")]
    pub jobs: Vec<JobConfig>,
}

/// `[settings]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsSection {
    /// Listing command run at the end of every job.
    #[serde(default = "default_list_command")]
    pub list_command: String,

    /// Default for jobs that don't set `abort_on_hook_failure` themselves.
    #[serde(default)]
    pub abort_on_hook_failure: bool,
}

fn default_list_command() -> String {
    "ls -alh".to_string()
}

impl Default for SettingsSection {
    fn default() -> Self {
        Self {
            list_command: default_list_command(),
            abort_on_hook_failure: false,
        }
    }
}

impl SettingsSection {
    pub fn executor_options(&self) -> ExecutorOptions {
        ExecutorOptions {
            list_command: self.list_command.clone(),
        }
    }
}

/// One `[[job]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    pub name: String,

    /// `archive`/`tar`, `mirror`/`rsync`, `copy`/`cp`, `custom` or `none`.
    /// Missing or unrecognised values mean "do nothing".
    #[serde(default)]
    pub strategy: Option<String>,

    pub source: PathBuf,
    pub target: PathBuf,

    /// Keep this many newest entries in `target`.
    #[serde(default)]
    pub retain: Option<usize>,

    #[serde(default)]
    pub pre: Option<String>,

    #[serde(default)]
    pub post: Option<String>,

    /// Command template for `strategy = "custom"`; `{source}` and `{target}`
    /// are substituted with quoted paths.
    #[serde(default)]
    pub command: Option<String>,

    #[serde(default)]
    pub when: Option<WhenConfig>,

    #[serde(default)]
    pub abort_on_hook_failure: Option<bool>,
}

/// `[job.when]`: every given check must pass for the job to run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhenConfig {
    /// Weekday names (`"mon"`, `"Tuesday"`, ...), local time.
    #[serde(default)]
    pub weekdays: Vec<String>,

    /// Shell command that must exit with status 0.
    #[serde(default)]
    pub command: Option<String>,
}

/// Validated job file, ready to run.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub settings: SettingsSection,
    pub batch: Batch,
}
