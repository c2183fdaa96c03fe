// src/types.rs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use chrono::Weekday;

use crate::action::Action;

/// Boxed, sendable future used at the trait seams (`CommandRunner`,
/// `CustomAction`).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How a job turns its source into a backup artifact.
///
/// - `Archive`: gzipped tarball at `<base>.tgz`.
/// - `Mirror`: `rsync -a` into `<base>`.
/// - `Copy`: `cp -rf` into `<base>`.
/// - `Custom`: the action gets `(source, base)` and does everything itself.
/// - `NoOp`: nothing is produced; the rest of the pipeline still runs.
#[derive(Debug, Clone, Default)]
pub enum Strategy {
    Archive,
    Mirror,
    Copy,
    Custom(Action),
    #[default]
    NoOp,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Archive => "archive",
            Strategy::Mirror => "mirror",
            Strategy::Copy => "copy",
            Strategy::Custom(_) => "custom",
            Strategy::NoOp => "none",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in strategy names as written in job files. `custom` is not parsed
/// here because it needs a command template alongside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinStrategy {
    Archive,
    Mirror,
    Copy,
    NoOp,
}

impl FromStr for BuiltinStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "archive" | "tar" => Ok(BuiltinStrategy::Archive),
            "mirror" | "rsync" => Ok(BuiltinStrategy::Mirror),
            "copy" | "cp" => Ok(BuiltinStrategy::Copy),
            "none" | "noop" | "" => Ok(BuiltinStrategy::NoOp),
            other => Err(format!("unknown strategy \"{other}\"")),
        }
    }
}

impl From<BuiltinStrategy> for Strategy {
    fn from(b: BuiltinStrategy) -> Self {
        match b {
            BuiltinStrategy::Archive => Strategy::Archive,
            BuiltinStrategy::Mirror => Strategy::Mirror,
            BuiltinStrategy::Copy => Strategy::Copy,
            BuiltinStrategy::NoOp => Strategy::NoOp,
        }
    }
}

/// Something to run before or after the backup itself.
#[derive(Debug, Clone)]
pub enum Hook {
    /// A shell command line, run through the command runner.
    Command(String),
    /// A custom action, called with `(source, base)` like a custom strategy.
    Custom(Action),
}

impl From<&str> for Hook {
    fn from(cmd: &str) -> Self {
        Hook::Command(cmd.to_string())
    }
}

impl From<String> for Hook {
    fn from(cmd: String) -> Self {
        Hook::Command(cmd)
    }
}

/// Predicate deciding at run time whether a job should run at all.
#[derive(Clone)]
pub enum Condition {
    /// Local weekday of the run is one of these.
    Weekdays(Vec<Weekday>),
    /// Shell command exits with status 0.
    Command(String),
    /// Arbitrary in-process predicate.
    Predicate(Arc<dyn Fn() -> bool + Send + Sync>),
    /// Every inner condition holds.
    All(Vec<Condition>),
}

impl Condition {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Condition::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Weekdays(days) => f.debug_tuple("Weekdays").field(days).finish(),
            Condition::Command(cmd) => f.debug_tuple("Command").field(cmd).finish(),
            Condition::Predicate(_) => f.write_str("Predicate(..)"),
            Condition::All(parts) => f.debug_tuple("All").field(parts).finish(),
        }
    }
}

/// Exit status of a finished command, as far as the pipeline cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const SUCCESS: CommandStatus = CommandStatus { code: Some(0) };

    pub fn from_code(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for CommandStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {code}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_strategy_accepts_command_aliases() {
        assert_eq!("tar".parse::<BuiltinStrategy>(), Ok(BuiltinStrategy::Archive));
        assert_eq!("RSYNC".parse::<BuiltinStrategy>(), Ok(BuiltinStrategy::Mirror));
        assert_eq!(" cp ".parse::<BuiltinStrategy>(), Ok(BuiltinStrategy::Copy));
        assert_eq!("none".parse::<BuiltinStrategy>(), Ok(BuiltinStrategy::NoOp));
        assert!("zip".parse::<BuiltinStrategy>().is_err());
    }

    #[test]
    fn signal_termination_is_not_success() {
        let status = CommandStatus { code: None };
        assert!(!status.success());
        assert_eq!(status.to_string(), "terminated by signal");
    }
}
