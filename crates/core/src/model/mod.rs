mod definition;
mod ids;
mod prepared;
mod progress;
mod question;

pub use definition::{TestDefinition, TestKind};
pub use ids::{SubjectId, TestId};
pub use prepared::{PreparedQuestion, ReviewEntry};
pub use progress::{ProgressMap, ProgressRecord};
pub use question::{Question, QuestionDraft, QuestionError, Subject};
