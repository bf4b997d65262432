//! Submission lifecycle.
//!
//! A submission moves `Idle -> Submitting -> Idle`. The coordinator owns that state machine
//! and turns judge outcomes into an [`Interpretation`]: the transcript lines to append plus the
//! side effects the contest editor applies (unfold the terminal, show the test results tab).
//!
//! The lifecycle is split in two so a frontend can keep its event loop running while the judge
//! works:
//!
//! 1. [`SubmissionCoordinator::begin`] checks the state, enters `Submitting` and hands out a
//!    [`SubmissionTicket`] carrying the file snapshot.
//! 2. [`SubmissionCoordinator::finish`] accepts the ticket back, returns to `Idle` and
//!    interprets the outcome.
//!
//! Only the ticket of the in-flight submission is accepted; anything else is stale.

use tracing::{info, warn};

use crate::error::{JudgeError, SubmitError};
use crate::files::FileSnapshot;
use crate::transcript::TranscriptEntry;
use crate::verdict::{TestCase, Verdict};

/// Shown after `"Error: "` when a backend failure carries no message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error occurred";
/// Error line appended before compiler output.
pub const COMPILATION_ERROR_MESSAGE: &str = "Compilation error:";
/// First line of a successful evaluation.
pub const SUBMISSION_SUCCESS_MESSAGE: &str = "Submission successful!";
/// Summary line when every test case passed.
pub const ALL_PASSED_MESSAGE: &str = "✅ All test cases passed!";

/// Submission state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SubmissionState {
    /// No submission in flight.
    #[default]
    Idle,
    /// Waiting for the judge.
    Submitting,
}

/// Proof of an in-flight submission, exchanged for its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    id: u64,
    files: Vec<FileSnapshot>,
}

impl SubmissionTicket {
    /// Submission sequence number (starts at 1).
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Files captured when the submission started.
    pub fn files(&self) -> &[FileSnapshot] {
        &self.files
    }

    /// Take the file snapshot, e.g. to move it into a backend call.
    pub fn take_files(&mut self) -> Vec<FileSnapshot> {
        std::mem::take(&mut self.files)
    }
}

/// State of the most recent submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionSession {
    /// Sequence number of the submission (0 before the first one).
    pub id: u64,
    /// Whether the judge has not answered yet.
    pub submitting: bool,
    /// Test cases of the last evaluated verdict; cleared when a new submission starts.
    pub last_test_cases: Vec<TestCase>,
}

/// What to do with a judge outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Transcript lines, in append order.
    pub entries: Vec<TranscriptEntry>,
    /// Unfold the terminal so the error is visible.
    pub unfold_terminal: bool,
    /// Switch to the test results tab, if there is one.
    pub show_test_cases: bool,
    /// Test cases to store for the results tab.
    pub test_cases: Vec<TestCase>,
}

/// `"Submitting code at {time}..."`.
pub fn submitting_message(time: &str) -> String {
    format!("Submitting code at {time}...")
}

/// `"⚠️ {passed}/{total} test cases passed."`.
pub fn partial_pass_message(passed: usize, total: usize) -> String {
    format!("⚠️ {passed}/{total} test cases passed.")
}

/// Interpret a verdict.
pub fn interpret_verdict(verdict: &Verdict) -> Interpretation {
    match verdict {
        Verdict::JudgeError { message } => Interpretation {
            entries: vec![TranscriptEntry::error(message.clone())],
            unfold_terminal: true,
            ..Interpretation::default()
        },
        Verdict::CompileFailure { message } => {
            let mut entries = vec![TranscriptEntry::error(COMPILATION_ERROR_MESSAGE)];
            if let Some(message) = message.as_ref().filter(|m| !m.is_empty()) {
                entries.push(TranscriptEntry::error(message.clone()));
            }
            Interpretation {
                entries,
                unfold_terminal: true,
                ..Interpretation::default()
            }
        }
        Verdict::Evaluated {
            all_passed,
            test_cases,
        } => {
            let summary = if *all_passed {
                ALL_PASSED_MESSAGE.to_string()
            } else {
                partial_pass_message(verdict.passed_count(), test_cases.len())
            };
            Interpretation {
                entries: vec![
                    TranscriptEntry::output(SUBMISSION_SUCCESS_MESSAGE),
                    TranscriptEntry::output(summary),
                ],
                unfold_terminal: false,
                show_test_cases: true,
                test_cases: test_cases.clone(),
            }
        }
    }
}

/// Interpret a backend failure: one `"Error: ..."` line, no other effects.
pub fn interpret_failure(error: &JudgeError) -> Interpretation {
    let message = error.message().unwrap_or(UNKNOWN_ERROR_MESSAGE);
    Interpretation {
        entries: vec![TranscriptEntry::error(format!("Error: {message}"))],
        ..Interpretation::default()
    }
}

/// Owner of the submission state machine.
#[derive(Debug, Clone, Default)]
pub struct SubmissionCoordinator {
    state: SubmissionState,
    next_id: u64,
    session: SubmissionSession,
}

impl SubmissionCoordinator {
    /// Create an idle coordinator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Returns `true` while waiting for the judge.
    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// The most recent session.
    pub fn session(&self) -> &SubmissionSession {
        &self.session
    }

    /// Enter `Submitting` with a snapshot of the files.
    ///
    /// Fails with [`SubmitError::AlreadySubmitting`] while another submission is in flight;
    /// the in-flight session is left untouched.
    pub fn begin(&mut self, files: Vec<FileSnapshot>) -> Result<SubmissionTicket, SubmitError> {
        if self.is_submitting() {
            warn!(active = self.session.id, "submission already in progress");
            return Err(SubmitError::AlreadySubmitting);
        }

        self.next_id += 1;
        self.state = SubmissionState::Submitting;
        self.session = SubmissionSession {
            id: self.next_id,
            submitting: true,
            last_test_cases: Vec::new(),
        };
        info!(id = self.next_id, files = files.len(), "submission started");
        Ok(SubmissionTicket {
            id: self.next_id,
            files,
        })
    }

    /// Return to `Idle` and interpret the outcome of the ticket's submission.
    ///
    /// The returned error is [`SubmitError::Judge`] for a backend failure, after its
    /// interpretation has been produced; callers apply the interpretation either way.
    pub fn finish(
        &mut self,
        ticket: &SubmissionTicket,
        outcome: &Result<Verdict, JudgeError>,
    ) -> Result<Interpretation, SubmitError> {
        self.release(ticket.id)?;

        let interpretation = match outcome {
            Ok(verdict) => {
                info!(
                    id = ticket.id,
                    accepted = verdict.is_accepted(),
                    passed = verdict.passed_count(),
                    total = verdict.test_cases().len(),
                    "submission judged"
                );
                interpret_verdict(verdict)
            }
            Err(error) => {
                warn!(id = ticket.id, %error, "submission failed");
                interpret_failure(error)
            }
        };
        self.session.last_test_cases = interpretation.test_cases.clone();
        Ok(interpretation)
    }

    /// Return to `Idle` without an outcome, e.g. when the awaiting future was dropped.
    ///
    /// Returns `false` when `id` is not the in-flight submission.
    pub fn abandon(&mut self, id: u64) -> bool {
        if self.release(id).is_err() {
            return false;
        }
        warn!(id, "submission abandoned before the judge answered");
        true
    }

    fn release(&mut self, id: u64) -> Result<(), SubmitError> {
        if !self.is_submitting() || self.session.id != id {
            return Err(SubmitError::StaleTicket(id));
        }
        self.state = SubmissionState::Idle;
        self.session.submitting = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files() -> Vec<FileSnapshot> {
        vec![FileSnapshot::new("main.py", "print(1)")]
    }

    #[test]
    fn test_reentrant_begin_is_rejected() {
        let mut coordinator = SubmissionCoordinator::new();
        let ticket = coordinator.begin(files()).unwrap();
        assert_eq!(coordinator.begin(files()), Err(SubmitError::AlreadySubmitting));
        assert_eq!(coordinator.session().id, ticket.id());
        assert!(coordinator.is_submitting());
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut coordinator = SubmissionCoordinator::new();
        let first = coordinator.begin(files()).unwrap();
        coordinator
            .finish(&first, &Ok(Verdict::evaluated(vec![])))
            .unwrap();
        let second = coordinator.begin(files()).unwrap();

        assert_eq!(
            coordinator.finish(&first, &Ok(Verdict::evaluated(vec![]))),
            Err(SubmitError::StaleTicket(1))
        );
        assert!(coordinator.is_submitting());
        assert!(coordinator.finish(&second, &Err(JudgeError::Unknown)).is_ok());
        assert_eq!(coordinator.state(), SubmissionState::Idle);
    }

    #[test]
    fn test_partial_pass_interpretation() {
        let verdict = Verdict::Evaluated {
            all_passed: false,
            test_cases: vec![
                TestCase::new("a", true),
                TestCase::new("b", false),
                TestCase::new("c", true),
            ],
        };
        let interpretation = interpret_verdict(&verdict);
        assert_eq!(
            interpretation.entries,
            vec![
                TranscriptEntry::output("Submission successful!"),
                TranscriptEntry::output("⚠️ 2/3 test cases passed."),
            ]
        );
        assert!(interpretation.show_test_cases);
        assert!(!interpretation.unfold_terminal);
    }

    #[test]
    fn test_compile_failure_with_and_without_output() {
        let bare = interpret_verdict(&Verdict::CompileFailure { message: None });
        assert_eq!(bare.entries, vec![TranscriptEntry::error("Compilation error:")]);
        assert!(bare.unfold_terminal);

        let detailed = interpret_verdict(&Verdict::CompileFailure {
            message: Some("main.cpp:1: expected ';'".into()),
        });
        assert_eq!(detailed.entries.len(), 2);
        assert_eq!(detailed.entries[1].content, "main.cpp:1: expected ';'");
    }

    #[test]
    fn test_failure_message_defaults() {
        assert_eq!(
            interpret_failure(&JudgeError::Unknown).entries,
            vec![TranscriptEntry::error("Error: Unknown error occurred")]
        );
        assert_eq!(
            interpret_failure(&JudgeError::Transport(String::new())).entries,
            vec![TranscriptEntry::error("Error: Unknown error occurred")]
        );
        assert_eq!(
            interpret_failure(&JudgeError::Transport("network down".into())).entries,
            vec![TranscriptEntry::error("Error: network down")]
        );
    }

    #[test]
    fn test_abandon_only_matches_in_flight_submission() {
        let mut coordinator = SubmissionCoordinator::new();
        let ticket = coordinator.begin(files()).unwrap();
        assert!(!coordinator.abandon(ticket.id() + 1));
        assert!(coordinator.abandon(ticket.id()));
        assert!(!coordinator.abandon(ticket.id()));
        assert_eq!(coordinator.state(), SubmissionState::Idle);
    }
}
