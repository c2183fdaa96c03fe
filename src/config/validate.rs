// src/config/validate.rs

use chrono::Weekday;
use tracing::warn;

use crate::action::Action;
use crate::config::model::{ConfigFile, JobConfig, RawConfigFile, SettingsSection, WhenConfig};
use crate::errors::{BatchupError, Result};
use crate::job::{Batch, Job};
use crate::types::{BuiltinStrategy, Condition, Hook, Strategy};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::BatchupError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_jobs(&raw)?;
        let jobs = raw
            .jobs
            .iter()
            .map(|job| job_from_config(job, &raw.settings))
            .collect::<Result<Vec<_>>>()?;
        let batch = Batch::new(jobs)?;
        Ok(ConfigFile {
            settings: raw.settings,
            batch,
        })
    }
}

fn ensure_has_jobs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.jobs.is_empty() {
        return Err(BatchupError::ConfigError(
            "config must contain at least one [[job]] section".to_string(),
        ));
    }
    Ok(())
}

fn job_from_config(cfg: &JobConfig, settings: &SettingsSection) -> Result<Job> {
    let strategy = strategy_from_config(cfg)?;

    let mut job = Job::new(
        cfg.name.clone(),
        strategy,
        cfg.source.clone(),
        cfg.target.clone(),
    )
    .abort_on_hook_failure(
        cfg.abort_on_hook_failure
            .unwrap_or(settings.abort_on_hook_failure),
    );

    job.retain = cfg.retain;
    job.pre = non_empty(&cfg.pre).map(Hook::from);
    job.post = non_empty(&cfg.post).map(Hook::from);
    if let Some(when) = &cfg.when {
        job.condition = condition_from_config(&cfg.name, when)?;
    }

    job.check()?;
    Ok(job)
}

fn strategy_from_config(cfg: &JobConfig) -> Result<Strategy> {
    let name = cfg.strategy.as_deref().unwrap_or("none");

    if name.trim().eq_ignore_ascii_case("custom") {
        return match non_empty(&cfg.command) {
            Some(template) => Ok(Strategy::Custom(Action::command_template(template))),
            None => Err(BatchupError::ConfigError(format!(
                "job '{}' uses strategy \"custom\" but has no `command`",
                cfg.name
            ))),
        };
    }

    if cfg.command.is_some() {
        return Err(BatchupError::ConfigError(format!(
            "job '{}' sets `command`, which only applies to strategy \"custom\"",
            cfg.name
        )));
    }

    match name.parse::<BuiltinStrategy>() {
        Ok(builtin) => Ok(builtin.into()),
        Err(e) => {
            warn!(job = %cfg.name, "{e}; job will not copy anything");
            Ok(Strategy::NoOp)
        }
    }
}

fn condition_from_config(job: &str, when: &WhenConfig) -> Result<Option<Condition>> {
    let mut parts = Vec::new();

    if !when.weekdays.is_empty() {
        let days = when
            .weekdays
            .iter()
            .map(|d| {
                d.trim().parse::<Weekday>().map_err(|_| {
                    BatchupError::ConfigError(format!(
                        "job '{job}' has unknown weekday \"{d}\" in `when.weekdays`"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        parts.push(Condition::Weekdays(days));
    }

    if let Some(cmd) = non_empty(&when.command) {
        parts.push(Condition::Command(cmd));
    }

    Ok(match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(Condition::All(parts)),
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_src: &str) -> Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml_src)?;
        ConfigFile::try_from(raw)
    }

    #[test]
    fn jobs_keep_file_order() {
        let cfg = parse(
            r#"
[[job]]
name = "zeta"
strategy = "tar"
source = "/a"
target = "/b"

[[job]]
name = "alpha"
strategy = "rsync"
source = "/c"
target = "/d"
retain = 3
"#,
        )
        .unwrap();

        let names: Vec<_> = cfg.batch.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(matches!(cfg.batch.jobs()[0].strategy, Strategy::Archive));
        assert!(matches!(cfg.batch.jobs()[1].strategy, Strategy::Mirror));
        assert_eq!(cfg.batch.jobs()[1].retain, Some(3));
    }

    #[test]
    fn unknown_strategy_becomes_noop() {
        let cfg = parse(
            r#"
[[job]]
name = "x"
strategy = "zip"
source = "/a"
target = "/b"
"#,
        )
        .unwrap();
        assert!(matches!(cfg.batch.jobs()[0].strategy, Strategy::NoOp));
    }

    #[test]
    fn custom_strategy_requires_command() {
        let err = parse(
            r#"
[[job]]
name = "x"
strategy = "custom"
source = "/a"
target = "/b"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, BatchupError::ConfigError(msg) if msg.contains("no `command`")));
    }

    #[test]
    fn weekdays_and_command_combine() {
        let cfg = parse(
            r#"
[[job]]
name = "x"
strategy = "cp"
source = "/a"
target = "/b"

[job.when]
weekdays = ["tue", "Friday"]
command = "test -d /b"
"#,
        )
        .unwrap();

        match &cfg.batch.jobs()[0].condition {
            Some(Condition::All(parts)) => {
                assert!(matches!(&parts[0], Condition::Weekdays(d) if d == &vec![Weekday::Tue, Weekday::Fri]));
                assert!(matches!(&parts[1], Condition::Command(c) if c == "test -d /b"));
            }
            other => panic!("expected combined condition, got {other:?}"),
        }
    }

    #[test]
    fn bad_weekday_is_rejected() {
        let err = parse(
            r#"
[[job]]
name = "x"
source = "/a"
target = "/b"
when = { weekdays = ["someday"] }
"#,
        )
        .unwrap_err();
        assert!(matches!(err, BatchupError::ConfigError(msg) if msg.contains("someday")));
    }

    #[test]
    fn hook_failure_policy_falls_back_to_settings() {
        let cfg = parse(
            r#"
[settings]
abort_on_hook_failure = true

[[job]]
name = "inherit"
source = "/a"
target = "/b"

[[job]]
name = "override"
source = "/a"
target = "/c"
abort_on_hook_failure = false
"#,
        )
        .unwrap();
        assert!(cfg.batch.jobs()[0].abort_on_hook_failure);
        assert!(!cfg.batch.jobs()[1].abort_on_hook_failure);
    }

    #[test]
    fn empty_file_is_rejected() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, BatchupError::ConfigError(msg) if msg.contains("at least one")));
    }
}
