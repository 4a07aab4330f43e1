//! Question-by-question state machine for one pass over a prepared attempt.
//!
//! `AwaitingSelection -> Revealed -> (AwaitingSelection | Complete)`. Every
//! operation checks its precondition first and returns an error without touching
//! state when it does not hold.

use std::fmt;
use thiserror::Error;

use crate::model::{PreparedQuestion, ReviewEntry, TestKind};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("attempt has no questions")]
    Empty,

    #[error("cannot {action} while {phase}")]
    InvalidTransition {
        action: AttemptAction,
        phase: AttemptPhase,
    },

    #[error("no option selected")]
    NoSelection,

    #[error("option is not offered for this question: {0}")]
    UnknownOption(String),
}

//
// ─── STATE ────────────────────────────────────────────────────────────────────
//

/// Main pass or the follow-up pass over the main pass's mistakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptKind {
    Main,
    MistakesRetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptPhase {
    AwaitingSelection,
    Revealed,
    Complete,
}

impl fmt::Display for AttemptPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttemptPhase::AwaitingSelection => "awaiting selection",
            AttemptPhase::Revealed => "revealed",
            AttemptPhase::Complete => "complete",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttemptAction {
    Select,
    Submit,
    Advance,
}

impl fmt::Display for AttemptAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttemptAction::Select => "select an option",
            AttemptAction::Submit => "submit",
            AttemptAction::Advance => "advance",
        };
        f.write_str(label)
    }
}

/// Inputs accepted by [`Attempt::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptEvent {
    Select(String),
    Submit,
    Advance,
}

/// Shown after a submit until the attempt advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_answer: String,
}

/// Aggregated view of attempt position, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── ATTEMPT ──────────────────────────────────────────────────────────────────
//

/// One in-flight attempt. Never persisted.
///
/// Scoring side effects depend on the attempt kind and the test kind:
/// - main pass of a main test: wrong answers are collected as mistakes;
/// - main pass of a random test: every answer is appended to the review log;
/// - mistakes retry: only the correct count is tracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    kind: AttemptKind,
    test_kind: TestKind,
    questions: Vec<PreparedQuestion>,
    cursor: usize,
    selected: Option<String>,
    phase: AttemptPhase,
    feedback: Option<AnswerFeedback>,
    correct_count: u32,
    answered: usize,
    mistakes: Vec<PreparedQuestion>,
    review_log: Vec<ReviewEntry>,
}

impl Attempt {
    /// Start a main pass over `questions` for a test of `test_kind`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Empty` if `questions` is empty.
    pub fn main(questions: Vec<PreparedQuestion>, test_kind: TestKind) -> Result<Self, AttemptError> {
        Self::new(AttemptKind::Main, test_kind, questions)
    }

    /// Start a retry pass over the mistakes of a main test.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::Empty` if `questions` is empty.
    pub fn mistakes_retry(questions: Vec<PreparedQuestion>) -> Result<Self, AttemptError> {
        Self::new(AttemptKind::MistakesRetry, TestKind::Main, questions)
    }

    fn new(
        kind: AttemptKind,
        test_kind: TestKind,
        questions: Vec<PreparedQuestion>,
    ) -> Result<Self, AttemptError> {
        if questions.is_empty() {
            return Err(AttemptError::Empty);
        }

        Ok(Self {
            kind,
            test_kind,
            questions,
            cursor: 0,
            selected: None,
            phase: AttemptPhase::AwaitingSelection,
            feedback: None,
            correct_count: 0,
            answered: 0,
            mistakes: Vec::new(),
            review_log: Vec::new(),
        })
    }

    #[must_use]
    pub fn kind(&self) -> AttemptKind {
        self.kind
    }

    #[must_use]
    pub fn test_kind(&self) -> TestKind {
        self.test_kind
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        self.phase
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn questions(&self) -> &[PreparedQuestion] {
        &self.questions
    }

    /// Question under the cursor. Stays on the last question once complete.
    #[must_use]
    pub fn current_question(&self) -> &PreparedQuestion {
        &self.questions[self.cursor]
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Feedback for the current question, present only while revealed.
    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        match self.phase {
            AttemptPhase::Revealed => self.feedback.as_ref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn mistakes(&self) -> &[PreparedQuestion] {
        &self.mistakes
    }

    #[must_use]
    pub fn review_log(&self) -> &[ReviewEntry] {
        &self.review_log
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == AttemptPhase::Complete
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.cursor + 1 == self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> AttemptProgress {
        AttemptProgress {
            total: self.questions.len(),
            answered: self.answered,
            remaining: self.questions.len().saturating_sub(self.answered),
            is_complete: self.is_complete(),
        }
    }

    fn require(&self, action: AttemptAction, phase: AttemptPhase) -> Result<(), AttemptError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(AttemptError::InvalidTransition {
                action,
                phase: self.phase,
            })
        }
    }

    /// Choose an option for the current question. Re-selecting replaces the choice.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless awaiting a selection, or `UnknownOption`
    /// if the option is not offered for the current question.
    pub fn select_option(&mut self, option: &str) -> Result<(), AttemptError> {
        self.require(AttemptAction::Select, AttemptPhase::AwaitingSelection)?;
        if !self.current_question().has_option(option) {
            return Err(AttemptError::UnknownOption(option.to_owned()));
        }
        self.selected = Some(option.to_owned());
        Ok(())
    }

    /// Score the selected option and reveal the answer.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless awaiting a selection, or `NoSelection`
    /// when nothing has been selected.
    pub fn submit(&mut self) -> Result<&AnswerFeedback, AttemptError> {
        self.require(AttemptAction::Submit, AttemptPhase::AwaitingSelection)?;
        let chosen = self.selected.clone().ok_or(AttemptError::NoSelection)?;

        let current = &self.questions[self.cursor];
        let is_correct = current.is_correct(&chosen);
        if is_correct {
            self.correct_count += 1;
        }

        match (self.kind, self.test_kind) {
            (AttemptKind::Main, TestKind::Main) if !is_correct => {
                self.mistakes.push(current.clone());
            }
            (AttemptKind::Main, TestKind::Random) => {
                self.review_log.push(ReviewEntry {
                    question: current.clone(),
                    chosen_option: chosen,
                    is_correct,
                });
            }
            _ => {}
        }

        let feedback = AnswerFeedback {
            is_correct,
            correct_answer: current.correct_answer.clone(),
        };
        self.answered += 1;
        self.phase = AttemptPhase::Revealed;
        Ok(&*self.feedback.insert(feedback))
    }

    /// Move past a revealed question; completes the attempt after the last one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTransition` unless the current answer is revealed.
    pub fn advance(&mut self) -> Result<AttemptPhase, AttemptError> {
        self.require(AttemptAction::Advance, AttemptPhase::Revealed)?;

        if self.is_last_question() {
            self.phase = AttemptPhase::Complete;
        } else {
            self.cursor += 1;
            self.selected = None;
            self.feedback = None;
            self.phase = AttemptPhase::AwaitingSelection;
        }
        Ok(self.phase)
    }

    /// Dispatch an event to the matching transition.
    ///
    /// # Errors
    ///
    /// Propagates the transition's precondition error; state is left unchanged.
    pub fn apply(&mut self, event: AttemptEvent) -> Result<AttemptPhase, AttemptError> {
        match event {
            AttemptEvent::Select(option) => self.select_option(&option)?,
            AttemptEvent::Submit => {
                self.submit()?;
            }
            AttemptEvent::Advance => {
                self.advance()?;
            }
        }
        Ok(self.phase)
    }
}
