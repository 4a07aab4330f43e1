mod flow;
mod service;
mod view;

// Public API of the session subsystem.
pub use crate::error::{FlowError, SessionError};
pub use flow::{QuizEvent, QuizFlow, Screen};
pub use service::{QuizSession, SessionOutcome, SessionStage};
pub use view::{AttemptView, ResultSummary};
