use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::ids::{SubjectId, TestId};

//
// ─── PROGRESS RECORD ──────────────────────────────────────────────────────────
//

/// Best-ever outcome for one `(subject, test)` pair.
///
/// Serialized as `{ "bestScore", "total", "passed" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub best_score: u32,
    pub total: u32,
    pub passed: bool,
}

impl ProgressRecord {
    /// Merge a finished attempt into an optional existing record.
    ///
    /// `best_score` never decreases, `total` takes the latest attempt's value and
    /// `passed` holds exactly when the best score equals the total.
    #[must_use]
    pub fn merge(existing: Option<&Self>, final_correct: u32, total: u32) -> Self {
        let best_score = existing.map_or(0, |r| r.best_score).max(final_correct);
        Self {
            best_score,
            total,
            passed: best_score == total,
        }
    }
}

//
// ─── PROGRESS MAP ─────────────────────────────────────────────────────────────
//

/// Full persisted progress: `subject -> test -> record`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap(BTreeMap<SubjectId, BTreeMap<TestId, ProgressRecord>>);

impl ProgressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, subject: &SubjectId, test: TestId) -> Option<&ProgressRecord> {
        self.0.get(subject).and_then(|tests| tests.get(&test))
    }

    /// All records for one subject, keyed by test.
    #[must_use]
    pub fn subject(&self, subject: &SubjectId) -> Option<&BTreeMap<TestId, ProgressRecord>> {
        self.0.get(subject)
    }

    /// Merge an outcome into the record for `(subject, test)`, leaving every
    /// other entry untouched. Returns the updated record.
    pub fn record(
        &mut self,
        subject: &SubjectId,
        test: TestId,
        final_correct: u32,
        total: u32,
    ) -> ProgressRecord {
        let tests = self.0.entry(subject.clone()).or_default();
        let merged = ProgressRecord::merge(tests.get(&test), final_correct, total);
        tests.insert(test, merged);
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SubjectId, &BTreeMap<TestId, ProgressRecord>)> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
