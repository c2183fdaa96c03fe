// src/engine/core.rs

//! Pure job state machine.
//!
//! The executor asks this module where to go next after each step; the
//! transitions themselves involve no IO and are unit tested on their own.

/// Pipeline states of one job, in execution order, plus the three terminal
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Start,
    ConditionCheck,
    PreCommand,
    ValidateTarget,
    ValidateSource,
    Dispatch,
    PostCommand,
    Rotate,
    ListTarget,
    Done,
    Skipped,
    Aborted,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Skipped | JobState::Aborted)
    }

    /// Next state on the happy path. Terminal states map to themselves.
    pub fn successor(self) -> JobState {
        match self {
            JobState::Start => JobState::ConditionCheck,
            JobState::ConditionCheck => JobState::PreCommand,
            JobState::PreCommand => JobState::ValidateTarget,
            JobState::ValidateTarget => JobState::ValidateSource,
            JobState::ValidateSource => JobState::Dispatch,
            JobState::Dispatch => JobState::PostCommand,
            JobState::PostCommand => JobState::Rotate,
            JobState::Rotate => JobState::ListTarget,
            JobState::ListTarget => JobState::Done,
            terminal => terminal,
        }
    }
}

/// What running a single state produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    /// The job's condition did not hold.
    Skip,
    /// Stop this job; the reason has already been shown to the user.
    Abort(String),
}

pub fn transition(state: JobState, result: &StepResult) -> JobState {
    if state.is_terminal() {
        return state;
    }
    match result {
        StepResult::Continue => state.successor(),
        StepResult::Skip => JobState::Skipped,
        StepResult::Abort(_) => JobState::Aborted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_visits_every_state_in_order() {
        let mut state = JobState::Start;
        let mut seen = vec![state];
        while !state.is_terminal() {
            state = transition(state, &StepResult::Continue);
            seen.push(state);
        }

        assert_eq!(
            seen,
            vec![
                JobState::Start,
                JobState::ConditionCheck,
                JobState::PreCommand,
                JobState::ValidateTarget,
                JobState::ValidateSource,
                JobState::Dispatch,
                JobState::PostCommand,
                JobState::Rotate,
                JobState::ListTarget,
                JobState::Done,
            ]
        );
    }

    #[test]
    fn skip_and_abort_short_circuit() {
        assert_eq!(
            transition(JobState::ConditionCheck, &StepResult::Skip),
            JobState::Skipped
        );
        assert_eq!(
            transition(JobState::ValidateSource, &StepResult::Abort("gone".into())),
            JobState::Aborted
        );
    }

    #[test]
    fn terminal_states_are_sticky() {
        for terminal in [JobState::Done, JobState::Skipped, JobState::Aborted] {
            assert_eq!(transition(terminal, &StepResult::Continue), terminal);
            assert_eq!(transition(terminal, &StepResult::Abort("x".into())), terminal);
        }
    }
}
