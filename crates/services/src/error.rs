//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{SubjectId, TestId};
use quiz_core::{AttemptError, PrepareError};
use storage::content::ContentError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("the current attempt is not complete")]
    NotComplete,
    #[error("mistakes retry is not available for this session")]
    RetryUnavailable,
    #[error("session outcome was already recorded")]
    AlreadyRecorded,
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    #[error(transparent)]
    Attempt(#[from] AttemptError),
}

/// Errors emitted by `QuizFlow` when an event cannot be applied.
///
/// The flow keeps its previous screen whenever one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlowError {
    #[error("unknown subject: {0}")]
    UnknownSubject(SubjectId),
    #[error("unknown test {test} for subject {subject}")]
    UnknownTest { subject: SubjectId, test: TestId },
    #[error("{event} is not accepted on the {screen} screen")]
    InvalidEvent {
        event: &'static str,
        screen: &'static str,
    },
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Content(#[from] ContentError),
}
