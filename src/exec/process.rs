// src/exec/process.rs

//! Running shell command lines as child processes.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::process::Command;
use tracing::debug;

use crate::errors::{BatchupError, Result};
use crate::exec::backend::CommandRunner;
use crate::exec::stream::drain_interleaved;
use crate::output::Console;
use crate::types::{BoxFuture, CommandStatus};

/// Production [`CommandRunner`]: prints `-> <command>`, runs it through the
/// platform shell and streams its output to the console while it runs.
///
/// There is no timeout. A command that never exits blocks its caller.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    console: Arc<dyn Console>,
}

impl ProcessRunner {
    pub fn new(console: Arc<dyn Console>) -> Self {
        Self { console }
    }

    pub async fn run_command(&self, command_line: &str) -> Result<CommandStatus> {
        self.console.line(&format!("-> {command_line}"));
        debug!(cmd = %command_line, "starting command");

        let mut cmd = shell_command(command_line);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| BatchupError::Launch {
            command: command_line.to_string(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| anyhow!("stdout of `{command_line}` was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| anyhow!("stderr of `{command_line}` was not captured"))?;

        let stats = drain_interleaved(stdout, stderr, self.console.as_ref())
            .await
            .with_context(|| format!("reading output of `{command_line}`"))?;

        let status = child
            .wait()
            .await
            .with_context(|| format!("waiting for `{command_line}`"))?;
        let status = CommandStatus::from(status);

        debug!(
            cmd = %command_line,
            exit_code = ?status.code,
            stdout_bytes = stats.stdout_bytes,
            stderr_bytes = stats.stderr_bytes,
            "command exited"
        );

        Ok(status)
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(&'a self, command_line: &'a str) -> BoxFuture<'a, Result<CommandStatus>> {
        Box::pin(self.run_command(command_line))
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_line);
        c
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::output::MemoryConsole;

    fn runner() -> (ProcessRunner, MemoryConsole) {
        let console = MemoryConsole::new();
        (ProcessRunner::new(Arc::new(console.clone())), console)
    }

    #[tokio::test]
    async fn announces_command_then_streams_its_output() {
        let (runner, console) = runner();

        let status = runner.run_command("echo hello").await.unwrap();

        assert!(status.success());
        assert_eq!(console.lines(), vec!["-> echo hello", "hello"]);
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_status_not_an_error() {
        let (runner, _console) = runner();

        let status = runner.run_command("exit 3").await.unwrap();

        assert_eq!(status, CommandStatus::from_code(3));
    }

    #[tokio::test]
    async fn stderr_is_forwarded_too() {
        let (runner, console) = runner();

        runner.run_command("echo oops 1>&2").await.unwrap();

        assert!(console.contents().contains("oops\n"));
    }
}
