use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::model::ids::SubjectId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("correct answer cannot be empty")]
    EmptyCorrectAnswer,

    #[error("question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("correct answer is not among the options: {0}")]
    CorrectAnswerMissing(String),
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// Raw bank entry as it appears in a content file.
///
/// Field names follow the content format: `question`, `correctAnswer`, `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    pub correct_answer: String,
    pub options: Vec<String>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// Options are compared by value, so a bank question must not repeat an option.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the text or answer is blank, there are fewer than
    /// two options, an option repeats, or the correct answer is not one of the options.
    pub fn validate(self) -> Result<Question, QuestionError> {
        if self.question.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if self.correct_answer.trim().is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }
        if self.options.len() < 2 {
            return Err(QuestionError::TooFewOptions(self.options.len()));
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !seen.contains(self.correct_answer.as_str()) {
            return Err(QuestionError::CorrectAnswerMissing(self.correct_answer));
        }

        Ok(Question {
            text: self.question,
            correct_answer: self.correct_answer,
            options: self.options,
        })
    }
}

/// Immutable bank question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    correct_answer: String,
    options: Vec<String>,
}

impl Question {
    /// Convenience constructor that validates in one step.
    ///
    /// # Errors
    ///
    /// See [`QuestionDraft::validate`].
    pub fn new(
        text: impl Into<String>,
        correct_answer: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, QuestionError> {
        QuestionDraft {
            question: text.into(),
            correct_answer: correct_answer.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
        .validate()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

//
// ─── SUBJECT ──────────────────────────────────────────────────────────────────
//

/// A named, ordered question bank. Indexes into `questions` are stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    title: String,
    questions: Vec<Question>,
}

impl Subject {
    #[must_use]
    pub fn new(id: SubjectId, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id,
            title: title.into(),
            questions,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SubjectId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
