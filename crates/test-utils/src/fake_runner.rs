use std::sync::{Arc, Mutex};

use batchup::errors::{BatchupError, Result};
use batchup::exec::CommandRunner;
use batchup::output::{Console, MemoryConsole};
use batchup::types::{BoxFuture, CommandStatus};

#[derive(Debug, Default)]
struct Script {
    /// `(needle, exit code)`; the first needle contained in a command wins.
    exits: Vec<(String, i32)>,
    /// Commands containing one of these fail to launch.
    unlaunchable: Vec<String>,
}

/// A fake command runner that:
/// - records every command line it is asked to run
/// - announces it as `-> cmd` on the console, like the real runner
/// - succeeds unless a scripted exit code matches.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    executed: Arc<Mutex<Vec<String>>>,
    script: Arc<Mutex<Script>>,
    console: MemoryConsole,
}

impl FakeRunner {
    pub fn new(console: MemoryConsole) -> Self {
        Self {
            console,
            ..Self::default()
        }
    }

    /// Commands containing `needle` exit with `code`.
    pub fn exit_with(self, needle: &str, code: i32) -> Self {
        self.script
            .lock()
            .unwrap()
            .exits
            .push((needle.to_string(), code));
        self
    }

    /// Commands containing `needle` cannot be launched at all.
    pub fn fail_launch(self, needle: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .unlaunchable
            .push(needle.to_string());
        self
    }

    /// Every command line run so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.executed().iter().any(|c| c.contains(needle))
    }

    fn status_for(&self, command_line: &str) -> Option<i32> {
        let script = self.script.lock().unwrap();
        script
            .exits
            .iter()
            .find(|(needle, _)| command_line.contains(needle.as_str()))
            .map(|(_, code)| *code)
    }

    fn launchable(&self, command_line: &str) -> bool {
        let script = self.script.lock().unwrap();
        !script
            .unlaunchable
            .iter()
            .any(|needle| command_line.contains(needle.as_str()))
    }
}

impl CommandRunner for FakeRunner {
    fn run<'a>(&'a self, command_line: &'a str) -> BoxFuture<'a, Result<CommandStatus>> {
        Box::pin(async move {
            self.console.line(&format!("-> {command_line}"));
            self.executed.lock().unwrap().push(command_line.to_string());

            if !self.launchable(command_line) {
                return Err(BatchupError::Launch {
                    command: command_line.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such program"),
                });
            }

            Ok(CommandStatus::from_code(self.status_for(command_line).unwrap_or(0)))
        })
    }
}
