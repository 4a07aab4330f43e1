use std::sync::Arc;

use quiz_core::model::{
    ProgressMap, ProgressRecord, SubjectId, TestDefinition, TestId, TestKind,
};
use storage::repository::ProgressRepository;

/// Per-test progress line for the test list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub test_id: TestId,
    pub title: String,
    pub kind: TestKind,
    pub question_count: usize,
    pub best_score: u32,
    pub total: u32,
    pub passed: bool,
}

/// Owns the progress mapping and merges finished attempts into it.
///
/// The mapping is read once when the service is loaded. Every update merges into the
/// full in-memory mapping and writes the whole mapping back. Storage failures are
/// logged and swallowed; the in-memory mapping stays authoritative for the session.
pub struct ProgressService {
    repo: Arc<dyn ProgressRepository>,
    progress: ProgressMap,
}

impl ProgressService {
    /// Load the persisted mapping, falling back to an empty one.
    pub async fn load(repo: Arc<dyn ProgressRepository>) -> Self {
        let progress = match repo.load().await {
            Ok(Some(progress)) => progress,
            Ok(None) => ProgressMap::new(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load progress, starting empty");
                ProgressMap::new()
            }
        };
        Self { repo, progress }
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    #[must_use]
    pub fn record(&self, subject: &SubjectId, test: TestId) -> Option<&ProgressRecord> {
        self.progress.get(subject, test)
    }

    /// Merge an outcome for `(subject, test)` and persist the full mapping.
    ///
    /// Returns the merged record even if persisting fails.
    pub async fn record_outcome(
        &mut self,
        subject: &SubjectId,
        test: TestId,
        final_correct: u32,
        total: u32,
    ) -> ProgressRecord {
        let mut next = self.progress.clone();
        let merged = next.record(subject, test, final_correct, total);
        self.progress = next;

        tracing::debug!(
            subject = %subject,
            test = %test,
            final_correct,
            total,
            best_score = merged.best_score,
            "recorded outcome"
        );

        if let Err(err) = self.repo.save(&self.progress).await {
            tracing::warn!(error = %err, "failed to save progress");
        }
        merged
    }

    /// Progress lines for `tests`, defaulting to zero for tests never finished.
    #[must_use]
    pub fn test_summaries(&self, subject: &SubjectId, tests: &[TestDefinition]) -> Vec<TestSummary> {
        tests
            .iter()
            .map(|test| {
                let size = test.attempt_size();
                let record = self.progress.get(subject, test.id).copied().unwrap_or(
                    ProgressRecord {
                        best_score: 0,
                        total: u32::try_from(size).unwrap_or(u32::MAX),
                        passed: false,
                    },
                );
                TestSummary {
                    test_id: test.id,
                    title: test.title.clone(),
                    kind: test.kind,
                    question_count: size,
                    best_score: record.best_score,
                    total: record.total,
                    passed: record.passed,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::partition;
    use storage::repository::{PROGRESS_KEY, Storage, StorageError};

    struct FailingRepo;

    #[async_trait]
    impl ProgressRepository for FailingRepo {
        async fn load(&self) -> Result<Option<ProgressMap>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn save(&self, _progress: &ProgressMap) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    fn android() -> SubjectId {
        SubjectId::new("android")
    }

    #[tokio::test]
    async fn consecutive_sessions_keep_best_score() {
        let storage = Storage::in_memory();
        let mut service = ProgressService::load(Arc::clone(&storage.progress)).await;

        service.record_outcome(&android(), TestId::new(1), 20, 30).await;
        let rec = service.record_outcome(&android(), TestId::new(1), 25, 30).await;
        assert_eq!(rec.best_score, 25);
        assert!(!rec.passed);

        let reloaded = ProgressService::load(Arc::clone(&storage.progress)).await;
        assert_eq!(reloaded.record(&android(), TestId::new(1)), Some(&rec));
    }

    #[tokio::test]
    async fn updates_do_not_clobber_other_subjects() {
        let storage = Storage::in_memory();
        let mut service = ProgressService::load(Arc::clone(&storage.progress)).await;
        service.record_outcome(&SubjectId::new("inclusion"), TestId::new(11), 30, 30).await;
        service.record_outcome(&android(), TestId::new(2), 3, 30).await;

        let reloaded = ProgressService::load(Arc::clone(&storage.progress)).await;
        assert!(reloaded.record(&SubjectId::new("inclusion"), TestId::new(11)).unwrap().passed);
        assert_eq!(reloaded.record(&android(), TestId::new(2)).unwrap().best_score, 3);
    }

    #[tokio::test]
    async fn malformed_storage_loads_as_empty() {
        let storage = Storage::in_memory();
        storage.kv.set(PROGRESS_KEY, "[1, 2").await.unwrap();
        let service = ProgressService::load(Arc::clone(&storage.progress)).await;
        assert!(service.progress().is_empty());
    }

    #[tokio::test]
    async fn failing_storage_keeps_in_memory_progress() {
        let mut service = ProgressService::load(Arc::new(FailingRepo)).await;
        assert!(service.progress().is_empty());

        let rec = service.record_outcome(&android(), TestId::new(3), 30, 30).await;
        assert!(rec.passed);
        assert_eq!(service.record(&android(), TestId::new(3)), Some(&rec));
    }

    #[tokio::test]
    async fn summaries_default_to_attempt_size() {
        let storage = Storage::in_memory();
        let mut service = ProgressService::load(Arc::clone(&storage.progress)).await;
        let tests = partition(320);
        service.record_outcome(&android(), TestId::new(1), 29, 30).await;

        let summaries = service.test_summaries(&android(), &tests);
        assert_eq!(summaries.len(), 11);
        assert_eq!(summaries[0].best_score, 29);
        assert_eq!(summaries[9].question_count, 50);
        assert_eq!(summaries[9].total, 50);
        assert_eq!(summaries[10].kind, TestKind::Random);
        assert_eq!(summaries[10].total, 30);
        assert!(!summaries[10].passed);
    }
}
