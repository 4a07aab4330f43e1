//! Screen-level state machine driven by discrete UI events.
//!
//! Each event is folded into the current screen by [`reduce`], which owns the
//! screen value and returns the next one. Persisting an outcome is the only side
//! effect and runs after the reducer has produced the next screen.

use std::mem;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use quiz_core::model::{ProgressRecord, SubjectId, TestId};
use quiz_core::{AttemptEvent, AttemptPhase};

use super::service::{QuizSession, SessionOutcome, SessionStage};
use super::view::{AttemptView, ResultSummary};
use crate::catalog::SubjectCatalog;
use crate::error::FlowError;
use crate::progress_service::{ProgressService, TestSummary};

/// Inbound UI events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    ChooseSubject(SubjectId),
    ChooseTest(TestId),
    SelectOption(String),
    SubmitAnswer,
    Advance,
    ExitAttempt,
    StartMistakesRetry,
    FinishSession,
    Back,
}

impl QuizEvent {
    fn name(&self) -> &'static str {
        match self {
            QuizEvent::ChooseSubject(_) => "choose subject",
            QuizEvent::ChooseTest(_) => "choose test",
            QuizEvent::SelectOption(_) => "select option",
            QuizEvent::SubmitAnswer => "submit answer",
            QuizEvent::Advance => "advance",
            QuizEvent::ExitAttempt => "exit attempt",
            QuizEvent::StartMistakesRetry => "start mistakes retry",
            QuizEvent::FinishSession => "finish session",
            QuizEvent::Back => "back",
        }
    }
}

#[derive(Debug)]
pub enum Screen {
    Subjects,
    Tests { subject: SubjectId },
    Quiz { session: Box<QuizSession> },
    Result { session: Box<QuizSession> },
}

impl Screen {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Subjects => "subjects",
            Screen::Tests { .. } => "tests",
            Screen::Quiz { .. } => "quiz",
            Screen::Result { .. } => "result",
        }
    }

    /// Subject the screen belongs to, if any.
    #[must_use]
    pub fn subject(&self) -> Option<&SubjectId> {
        match self {
            Screen::Subjects => None,
            Screen::Tests { subject } => Some(subject),
            Screen::Quiz { session } | Screen::Result { session } => Some(session.subject_id()),
        }
    }
}

enum Transition {
    Next {
        screen: Screen,
        record: Option<SessionOutcome>,
    },
    Rejected {
        screen: Screen,
        error: FlowError,
    },
}

fn next(screen: Screen) -> Transition {
    Transition::Next {
        screen,
        record: None,
    }
}

fn rejected(screen: Screen, error: impl Into<FlowError>) -> Transition {
    Transition::Rejected {
        screen,
        error: error.into(),
    }
}

fn answer(mut session: Box<QuizSession>, event: AttemptEvent) -> Transition {
    match session.apply(event) {
        // A completed retry is recorded at once, whichever way the result is left.
        Ok(AttemptPhase::Complete) if session.stage() == SessionStage::RetryComplete => {
            let record = session.finish().ok();
            Transition::Next {
                screen: Screen::Result { session },
                record,
            }
        }
        Ok(AttemptPhase::Complete) => next(Screen::Result { session }),
        Ok(_) => next(Screen::Quiz { session }),
        Err(err) => rejected(Screen::Quiz { session }, err),
    }
}

fn reduce(
    screen: Screen,
    event: QuizEvent,
    catalog: &SubjectCatalog,
    rng: &mut StdRng,
) -> Transition {
    match (screen, event) {
        (Screen::Subjects, QuizEvent::ChooseSubject(subject)) => {
            if catalog.subject(&subject).is_some() {
                next(Screen::Tests { subject })
            } else {
                rejected(Screen::Subjects, FlowError::UnknownSubject(subject))
            }
        }
        (Screen::Tests { subject }, QuizEvent::ChooseTest(test_id)) => {
            let started = match (catalog.subject(&subject), catalog.test(&subject, test_id)) {
                (Some(source), Some(test)) => {
                    QuizSession::start_main(source, test, rng).map_err(FlowError::from)
                }
                _ => Err(FlowError::UnknownTest {
                    subject: subject.clone(),
                    test: test_id,
                }),
            };
            match started {
                Ok(session) => next(Screen::Quiz {
                    session: Box::new(session),
                }),
                Err(err) => rejected(Screen::Tests { subject }, err),
            }
        }
        (Screen::Tests { .. }, QuizEvent::Back) => next(Screen::Subjects),
        (Screen::Quiz { session }, QuizEvent::SelectOption(option)) => {
            answer(session, AttemptEvent::Select(option))
        }
        (Screen::Quiz { session }, QuizEvent::SubmitAnswer) => answer(session, AttemptEvent::Submit),
        (Screen::Quiz { session }, QuizEvent::Advance) => answer(session, AttemptEvent::Advance),
        (Screen::Quiz { session }, QuizEvent::ExitAttempt) => {
            tracing::debug!(subject = %session.subject_id(), test = %session.test().id, "attempt abandoned");
            next(Screen::Tests {
                subject: session.subject_id().clone(),
            })
        }
        (Screen::Result { mut session }, QuizEvent::StartMistakesRetry) => {
            match session.start_mistakes(rng) {
                Ok(()) => next(Screen::Quiz { session }),
                Err(err) => rejected(Screen::Result { session }, err),
            }
        }
        (Screen::Result { session }, QuizEvent::FinishSession) if session.is_recorded() => {
            next(Screen::Tests {
                subject: session.subject_id().clone(),
            })
        }
        (Screen::Result { mut session }, QuizEvent::FinishSession) => match session.finish() {
            Ok(outcome) => Transition::Next {
                screen: Screen::Tests {
                    subject: outcome.subject_id.clone(),
                },
                record: Some(outcome),
            },
            Err(err) => rejected(Screen::Result { session }, err),
        },
        (Screen::Result { session }, QuizEvent::Back) => {
            if !session.is_recorded() {
                tracing::debug!(subject = %session.subject_id(), test = %session.test().id, "result left without recording");
            }
            next(Screen::Subjects)
        }
        (screen, event) => {
            let error = FlowError::InvalidEvent {
                event: event.name(),
                screen: screen.name(),
            };
            rejected(screen, error)
        }
    }
}

//
// ─── FLOW ──────────────────────────────────────────────────────────────────────
//

/// Drives whole user sessions: subject and test choice, attempts, results and
/// progress recording.
pub struct QuizFlow {
    catalog: Arc<SubjectCatalog>,
    progress: ProgressService,
    rng: StdRng,
    screen: Screen,
    last_record: Option<ProgressRecord>,
}

impl QuizFlow {
    /// Start on the subject list with an OS-seeded random source.
    #[must_use]
    pub fn new(catalog: Arc<SubjectCatalog>, progress: ProgressService) -> Self {
        Self::with_rng(catalog, progress, StdRng::from_os_rng())
    }

    /// Start with a fixed seed for reproducible shuffles.
    #[must_use]
    pub fn with_seed(catalog: Arc<SubjectCatalog>, progress: ProgressService, seed: u64) -> Self {
        Self::with_rng(catalog, progress, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Arc<SubjectCatalog>, progress: ProgressService, rng: StdRng) -> Self {
        Self {
            catalog,
            progress,
            rng,
            screen: Screen::Subjects,
            last_record: None,
        }
    }

    /// Apply one UI event.
    ///
    /// # Errors
    ///
    /// Returns `FlowError` if the event does not apply to the current screen; the
    /// screen is left exactly as it was.
    pub async fn handle(&mut self, event: QuizEvent) -> Result<&Screen, FlowError> {
        let current = mem::replace(&mut self.screen, Screen::Subjects);
        let from = current.name();
        match reduce(current, event, &self.catalog, &mut self.rng) {
            Transition::Next { screen, record } => {
                self.screen = screen;
                if from != self.screen.name() {
                    tracing::debug!(from, to = self.screen.name(), "screen changed");
                }
                if let Some(outcome) = record {
                    let merged = self
                        .progress
                        .record_outcome(
                            &outcome.subject_id,
                            outcome.test_id,
                            outcome.final_correct,
                            outcome.total,
                        )
                        .await;
                    self.last_record = Some(merged);
                }
                Ok(&self.screen)
            }
            Transition::Rejected { screen, error } => {
                self.screen = screen;
                tracing::debug!(error = %error, "event rejected");
                Err(error)
            }
        }
    }

    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    #[must_use]
    pub fn catalog(&self) -> &SubjectCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }

    /// Record produced by the most recent finished session.
    #[must_use]
    pub fn last_record(&self) -> Option<&ProgressRecord> {
        self.last_record.as_ref()
    }

    #[must_use]
    pub fn attempt_view(&self) -> Option<AttemptView> {
        match &self.screen {
            Screen::Quiz { session } => Some(AttemptView::from_attempt(session.active_attempt())),
            _ => None,
        }
    }

    #[must_use]
    pub fn result_summary(&self) -> Option<ResultSummary> {
        match &self.screen {
            Screen::Result { session } => session.result(),
            _ => None,
        }
    }

    /// Progress lines for the current subject's tests.
    #[must_use]
    pub fn test_summaries(&self) -> Option<Vec<TestSummary>> {
        let subject = self.screen.subject()?;
        let tests = self.catalog.tests(subject)?;
        Some(self.progress.test_summaries(subject, tests))
    }
}

impl std::fmt::Debug for QuizFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizFlow")
            .field("subjects", &self.catalog.len())
            .field("screen", &self.screen)
            .finish_non_exhaustive()
    }
}
