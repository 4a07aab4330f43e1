use quiz_core::model::{Subject, SubjectId, TestDefinition, TestId};
use quiz_core::partition;

#[derive(Debug, Clone)]
struct CatalogEntry {
    subject: Subject,
    tests: Vec<TestDefinition>,
}

/// Subjects loaded at startup together with their derived tests.
#[derive(Debug, Clone, Default)]
pub struct SubjectCatalog {
    entries: Vec<CatalogEntry>,
}

impl SubjectCatalog {
    #[must_use]
    pub fn new(subjects: Vec<Subject>) -> Self {
        let entries = subjects
            .into_iter()
            .map(|subject| {
                let tests = partition(subject.questions().len());
                CatalogEntry { subject, tests }
            })
            .collect();
        Self { entries }
    }

    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.entries.iter().map(|entry| &entry.subject)
    }

    #[must_use]
    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.entry(id).map(|entry| &entry.subject)
    }

    #[must_use]
    pub fn tests(&self, id: &SubjectId) -> Option<&[TestDefinition]> {
        self.entry(id).map(|entry| entry.tests.as_slice())
    }

    #[must_use]
    pub fn test(&self, subject: &SubjectId, test: TestId) -> Option<&TestDefinition> {
        self.tests(subject)?.iter().find(|t| t.id == test)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, id: &SubjectId) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.subject.id() == id)
    }
}
