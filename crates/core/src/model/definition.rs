use serde::{Deserialize, Serialize};

use crate::model::ids::TestId;
use crate::partition::QUESTIONS_PER_TEST;

/// Whether a test is a fixed slice of the bank or a random draw from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestKind {
    Main,
    Random,
}

/// One of the fixed tests derived from a subject bank.
///
/// For `Main` tests `question_indexes` is the contiguous slice the test covers.
/// For `Random` tests it is the pool each attempt draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDefinition {
    pub id: TestId,
    pub title: String,
    pub kind: TestKind,
    pub question_indexes: Vec<usize>,
}

impl TestDefinition {
    #[must_use]
    pub fn is_random(&self) -> bool {
        self.kind == TestKind::Random
    }

    /// Number of questions a single attempt of this test presents.
    ///
    /// This is also the `total` recorded for the test's progress.
    #[must_use]
    pub fn attempt_size(&self) -> usize {
        match self.kind {
            TestKind::Main => self.question_indexes.len(),
            TestKind::Random => self.question_indexes.len().min(QUESTIONS_PER_TEST),
        }
    }
}
