use rand::Rng;
use std::fmt;

use quiz_core::model::{Subject, SubjectId, TestDefinition, TestId};
use quiz_core::{Attempt, AttemptEvent, AttemptPhase, prepare_attempt, prepare_retry};

use super::view::ResultSummary;
use crate::error::SessionError;

//
// ─── OUTCOME ───────────────────────────────────────────────────────────────────
//

/// What a finished session contributes to progress. Produced at most once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub subject_id: SubjectId,
    pub test_id: TestId,
    pub final_correct: u32,
    pub total: u32,
}

/// Where a session stands between its main pass and the optional retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStage {
    MainPass,
    MainComplete,
    RetryPass,
    RetryComplete,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user session on a test: a main pass, an optional mistakes retry, and a
/// single recorded outcome.
pub struct QuizSession {
    subject_id: SubjectId,
    test: TestDefinition,
    total: u32,
    main: Attempt,
    retry: Option<Attempt>,
    recorded: bool,
}

impl QuizSession {
    /// Prepare a fresh main pass of `test` over `subject`'s bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Prepare` if the test does not fit the bank, or
    /// `SessionError::Attempt` if it yields no questions.
    pub fn start_main<R: Rng + ?Sized>(
        subject: &Subject,
        test: &TestDefinition,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let questions = prepare_attempt(subject.questions(), test, rng)?;
        let main = Attempt::main(questions, test.kind)?;
        tracing::debug!(
            subject = %subject.id(),
            test = %test.id,
            questions = main.len(),
            "started main attempt"
        );

        Ok(Self {
            subject_id: subject.id().clone(),
            test: test.clone(),
            total: to_u32(main.len()),
            main,
            retry: None,
            recorded: false,
        })
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }

    #[must_use]
    pub fn test(&self) -> &TestDefinition {
        &self.test
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn main_attempt(&self) -> &Attempt {
        &self.main
    }

    #[must_use]
    pub fn retry_attempt(&self) -> Option<&Attempt> {
        self.retry.as_ref()
    }

    #[must_use]
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }

    #[must_use]
    pub fn stage(&self) -> SessionStage {
        match &self.retry {
            None if self.main.is_complete() => SessionStage::MainComplete,
            None => SessionStage::MainPass,
            Some(retry) if retry.is_complete() => SessionStage::RetryComplete,
            Some(_) => SessionStage::RetryPass,
        }
    }

    /// The attempt currently being answered: the retry once started, else the main pass.
    #[must_use]
    pub fn active_attempt(&self) -> &Attempt {
        self.retry.as_ref().unwrap_or(&self.main)
    }

    /// Forward an answer event to the active attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Attempt` if the attempt rejects the event.
    pub fn apply(&mut self, event: AttemptEvent) -> Result<AttemptPhase, SessionError> {
        let attempt = match self.retry.as_mut() {
            Some(retry) => retry,
            None => &mut self.main,
        };
        Ok(attempt.apply(event)?)
    }

    #[must_use]
    pub fn main_correct(&self) -> u32 {
        self.main.correct_count()
    }

    /// Correct answers of a completed retry; zero otherwise.
    #[must_use]
    pub fn mistakes_correct(&self) -> u32 {
        self.retry
            .as_ref()
            .filter(|retry| retry.is_complete())
            .map_or(0, Attempt::correct_count)
    }

    /// Score in effect right now: the main pass plus a completed retry.
    ///
    /// Random tests never have a retry, so this is the main pass score for them.
    #[must_use]
    pub fn final_correct(&self) -> u32 {
        self.main_correct() + self.mistakes_correct()
    }

    /// Whether a mistakes retry can be started now.
    #[must_use]
    pub fn can_retry_mistakes(&self) -> bool {
        !self.test.is_random()
            && !self.recorded
            && self.stage() == SessionStage::MainComplete
            && !self.main.mistakes().is_empty()
            && self.final_correct() < self.total
    }

    /// Start a retry over the main pass's mistakes, reshuffled.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::RetryUnavailable` unless [`Self::can_retry_mistakes`] holds.
    pub fn start_mistakes<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        if !self.can_retry_mistakes() {
            return Err(SessionError::RetryUnavailable);
        }
        let questions = prepare_retry(self.main.mistakes(), rng);
        self.retry = Some(Attempt::mistakes_retry(questions)?);
        tracing::debug!(
            subject = %self.subject_id,
            test = %self.test.id,
            mistakes = self.main.mistakes().len(),
            "started mistakes retry"
        );
        Ok(())
    }

    /// Result view, available once the active attempt is complete.
    #[must_use]
    pub fn result(&self) -> Option<ResultSummary> {
        match self.stage() {
            SessionStage::MainComplete | SessionStage::RetryComplete => {
                Some(ResultSummary::from_session(self))
            }
            SessionStage::MainPass | SessionStage::RetryPass => None,
        }
    }

    /// Close the session and hand out its outcome for recording.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while an attempt is in progress, or
    /// `SessionError::AlreadyRecorded` on a second call.
    pub fn finish(&mut self) -> Result<SessionOutcome, SessionError> {
        if self.recorded {
            return Err(SessionError::AlreadyRecorded);
        }
        if self.result().is_none() {
            return Err(SessionError::NotComplete);
        }
        self.recorded = true;

        Ok(SessionOutcome {
            subject_id: self.subject_id.clone(),
            test_id: self.test.id,
            final_correct: self.final_correct(),
            total: self.total,
        })
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("subject_id", &self.subject_id)
            .field("test_id", &self.test.id)
            .field("total", &self.total)
            .field("stage", &self.stage())
            .field("main_correct", &self.main_correct())
            .field("recorded", &self.recorded)
            .finish_non_exhaustive()
    }
}

pub(crate) fn to_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Question, TestKind};
    use quiz_core::partition;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn subject(n: usize) -> Subject {
        let questions = (0..n)
            .map(|i| {
                Question::new(format!("Q{i}"), format!("right{i}"), [format!("right{i}"), format!("wrong{i}")])
                    .unwrap()
            })
            .collect();
        Subject::new(SubjectId::new("android"), "Android", questions)
    }

    fn answer_current(session: &mut QuizSession, correct: bool) {
        let q = session.active_attempt().current_question().clone();
        let option = if correct {
            q.correct_answer.clone()
        } else {
            format!("wrong{}", q.original_index)
        };
        session.apply(AttemptEvent::Select(option)).unwrap();
        session.apply(AttemptEvent::Submit).unwrap();
        session.apply(AttemptEvent::Advance).unwrap();
    }

    #[test]
    fn retry_after_one_mistake_reaches_full_score() {
        let subject = subject(4);
        let test = partition(4).remove(0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = QuizSession::start_main(&subject, &test, &mut rng).unwrap();

        // Miss whichever question comes second.
        for i in 0..4 {
            answer_current(&mut session, i != 1);
        }
        assert_eq!(session.stage(), SessionStage::MainComplete);
        assert_eq!(session.main_attempt().mistakes().len(), 1);
        assert_eq!(session.final_correct(), 3);
        assert!(session.can_retry_mistakes());

        session.start_mistakes(&mut rng).unwrap();
        assert_eq!(session.stage(), SessionStage::RetryPass);
        assert!(session.result().is_none());
        answer_current(&mut session, true);

        assert_eq!(session.stage(), SessionStage::RetryComplete);
        let outcome = session.finish().unwrap();
        assert_eq!(outcome.final_correct, 4);
        assert_eq!(outcome.total, 4);
    }

    #[test]
    fn retry_is_offered_once() {
        let subject = subject(3);
        let test = partition(3).remove(0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = QuizSession::start_main(&subject, &test, &mut rng).unwrap();
        for _ in 0..3 {
            answer_current(&mut session, false);
        }
        session.start_mistakes(&mut rng).unwrap();
        for _ in 0..3 {
            answer_current(&mut session, false);
        }
        assert_eq!(session.final_correct(), 0);
        assert_eq!(
            session.start_mistakes(&mut rng).unwrap_err(),
            SessionError::RetryUnavailable
        );
    }

    #[test]
    fn perfect_main_pass_offers_no_retry() {
        let subject = subject(2);
        let test = partition(2).remove(0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = QuizSession::start_main(&subject, &test, &mut rng).unwrap();
        answer_current(&mut session, true);
        answer_current(&mut session, true);
        assert!(!session.can_retry_mistakes());
        assert!(session.result().unwrap().passed);
    }

    #[test]
    fn random_test_has_review_log_and_no_retry() {
        let subject = subject(300);
        let test = partition(300).pop().unwrap();
        assert_eq!(test.kind, TestKind::Random);
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = QuizSession::start_main(&subject, &test, &mut rng).unwrap();
        assert_eq!(session.total(), 30);

        for i in 0..30 {
            answer_current(&mut session, i % 2 == 0);
        }
        let result = session.result().unwrap();
        assert_eq!(result.review_log.len(), 30);
        assert!(result.mistakes.is_empty());
        assert_eq!(result.final_correct, 15);
        assert!(!session.can_retry_mistakes());
    }

    #[test]
    fn finish_requires_completion_and_happens_once() {
        let subject = subject(2);
        let test = partition(2).remove(0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = QuizSession::start_main(&subject, &test, &mut rng).unwrap();

        assert_eq!(session.finish().unwrap_err(), SessionError::NotComplete);
        answer_current(&mut session, true);
        answer_current(&mut session, false);

        let outcome = session.finish().unwrap();
        assert_eq!(outcome.final_correct, 1);
        assert_eq!(session.finish().unwrap_err(), SessionError::AlreadyRecorded);
        assert!(!session.can_retry_mistakes());
    }
}
