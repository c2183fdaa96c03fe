// src/engine/condition.rs

use chrono::{DateTime, Datelike, Local};
use tracing::debug;

use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::types::{BoxFuture, Condition};

/// Evaluate a job condition at `now`.
///
/// `Command` conditions run through `runner`, so their output shows up in
/// the report like any other command. `All` stops at the first condition
/// that does not hold.
pub fn condition_holds<'a>(
    condition: &'a Condition,
    runner: &'a dyn CommandRunner,
    now: DateTime<Local>,
) -> BoxFuture<'a, Result<bool>> {
    Box::pin(async move {
        let holds = match condition {
            Condition::Weekdays(days) => days.contains(&now.weekday()),
            Condition::Command(cmd) => runner.run(cmd).await?.success(),
            Condition::Predicate(f) => f(),
            Condition::All(parts) => {
                for part in parts {
                    if !condition_holds(part, runner, now).await? {
                        return Ok(false);
                    }
                }
                true
            }
        };
        debug!(?condition, holds, "evaluated condition");
        Ok(holds)
    })
}
