#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod progress_service;
pub mod sessions;

pub use sessions as session;

pub use app_services::AppServices;
pub use catalog::SubjectCatalog;
pub use error::{AppServicesError, FlowError, SessionError};
pub use progress_service::{ProgressService, TestSummary};

pub use sessions::{
    AttemptView, QuizEvent, QuizFlow, QuizSession, ResultSummary, Screen, SessionOutcome,
    SessionStage,
};
