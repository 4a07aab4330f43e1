use std::path::Path;
use std::sync::Arc;

use quiz_core::model::Subject;
use storage::content::load_subjects;
use storage::repository::Storage;

use crate::catalog::SubjectCatalog;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;
use crate::sessions::QuizFlow;

/// Assembles app-facing services from storage and loaded content.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    catalog: Arc<SubjectCatalog>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and a content directory.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or content loading fails.
    pub async fn new_sqlite(db_url: &str, content_dir: &Path) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let subjects = load_subjects(content_dir)?;
        tracing::info!(subjects = subjects.len(), dir = %content_dir.display(), "content loaded");
        Ok(Self::new(storage, subjects))
    }

    #[must_use]
    pub fn new(storage: Storage, subjects: Vec<Subject>) -> Self {
        Self {
            storage,
            catalog: Arc::new(SubjectCatalog::new(subjects)),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<SubjectCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Load progress from storage. Read failures yield empty progress.
    pub async fn progress_service(&self) -> ProgressService {
        ProgressService::load(Arc::clone(&self.storage.progress)).await
    }

    /// Build a flow positioned on the subject list, with progress loaded.
    pub async fn quiz_flow(&self, seed: Option<u64>) -> QuizFlow {
        let progress = self.progress_service().await;
        match seed {
            Some(seed) => QuizFlow::with_seed(self.catalog(), progress, seed),
            None => QuizFlow::new(self.catalog(), progress),
        }
    }
}
