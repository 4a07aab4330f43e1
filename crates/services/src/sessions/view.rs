use quiz_core::model::{PreparedQuestion, ReviewEntry, SubjectId, TestId};
use quiz_core::{AnswerFeedback, Attempt, AttemptKind, AttemptPhase};

use super::service::{QuizSession, SessionStage};

/// Snapshot of the question screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptView {
    pub kind: AttemptKind,
    pub phase: AttemptPhase,
    /// 1-based position of the current question.
    pub position: usize,
    pub len: usize,
    pub question: PreparedQuestion,
    pub selected: Option<String>,
    pub feedback: Option<AnswerFeedback>,
    pub is_last: bool,
}

impl AttemptView {
    #[must_use]
    pub fn from_attempt(attempt: &Attempt) -> Self {
        Self {
            kind: attempt.kind(),
            phase: attempt.phase(),
            position: attempt.cursor() + 1,
            len: attempt.len(),
            question: attempt.current_question().clone(),
            selected: attempt.selected().map(str::to_owned),
            feedback: attempt.feedback().cloned(),
            is_last: attempt.is_last_question(),
        }
    }
}

/// Snapshot of the result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSummary {
    pub subject_id: SubjectId,
    pub test_id: TestId,
    pub test_title: String,
    pub is_random: bool,
    pub main_correct: u32,
    pub final_correct: u32,
    pub total: u32,
    pub passed: bool,
    pub mistakes: Vec<PreparedQuestion>,
    pub review_log: Vec<ReviewEntry>,
    pub can_retry_mistakes: bool,
    pub retry_done: bool,
}

impl ResultSummary {
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Self {
        let main = session.main_attempt();
        let final_correct = session.final_correct();
        Self {
            subject_id: session.subject_id().clone(),
            test_id: session.test().id,
            test_title: session.test().title.clone(),
            is_random: session.test().is_random(),
            main_correct: session.main_correct(),
            final_correct,
            total: session.total(),
            passed: final_correct == session.total(),
            mistakes: main.mistakes().to_vec(),
            review_log: main.review_log().to_vec(),
            can_retry_mistakes: session.can_retry_mistakes(),
            retry_done: session.stage() == SessionStage::RetryComplete,
        }
    }
}
