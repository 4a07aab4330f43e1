//! Read-only subject banks loaded from JSON files at startup.
//!
//! A content directory holds one bank file per subject, each a JSON array of
//! `{ "question", "correctAnswer", "options" }`. An optional `subjects.json`
//! manifest lists `{ "id", "title", "file" }` entries; without it the four
//! default subjects are read from `<id>.json`.

use std::path::{Path, PathBuf};

use quiz_core::model::{Question, QuestionDraft, QuestionError, Subject, SubjectId};
use serde::Deserialize;
use thiserror::Error;

pub const MANIFEST_FILE: &str = "subjects.json";

/// `(id, title)` of the subjects used when no manifest is present.
pub const DEFAULT_SUBJECTS: [(&str, &str); 4] = [
    ("cyberSecurity", "Cyber Security"),
    ("android", "Android"),
    ("inclusion", "Learning Through Inclusion"),
    ("componentProgramming", "Component Programming"),
];

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid question #{index} in {path}: {source}")]
    InvalidQuestion {
        path: PathBuf,
        index: usize,
        #[source]
        source: QuestionError,
    },
}

#[derive(Debug, Clone, Deserialize)]
struct ManifestEntry {
    id: String,
    title: String,
    #[serde(default)]
    file: Option<String>,
}

impl ManifestEntry {
    fn file_name(&self) -> String {
        self.file.clone().unwrap_or_else(|| format!("{}.json", self.id))
    }
}

/// Load every subject of a content directory.
///
/// # Errors
///
/// Returns `ContentError` if the manifest or any bank cannot be read, parsed or validated.
pub fn load_subjects(dir: &Path) -> Result<Vec<Subject>, ContentError> {
    let manifest_path = dir.join(MANIFEST_FILE);
    let entries = if manifest_path.exists() {
        let raw = read(&manifest_path)?;
        serde_json::from_str::<Vec<ManifestEntry>>(&raw).map_err(|source| ContentError::Json {
            path: manifest_path.clone(),
            source,
        })?
    } else {
        DEFAULT_SUBJECTS
            .iter()
            .map(|(id, title)| ManifestEntry {
                id: (*id).to_owned(),
                title: (*title).to_owned(),
                file: None,
            })
            .collect()
    };

    let mut subjects = Vec::with_capacity(entries.len());
    for entry in entries {
        let questions = load_bank(&dir.join(entry.file_name()))?;
        tracing::debug!(subject = %entry.id, questions = questions.len(), "loaded bank");
        subjects.push(Subject::new(SubjectId::new(entry.id), entry.title, questions));
    }
    Ok(subjects)
}

/// Load and validate one bank file.
///
/// # Errors
///
/// Returns `ContentError` if the file cannot be read, is not a JSON question list,
/// or contains an invalid question.
pub fn load_bank(path: &Path) -> Result<Vec<Question>, ContentError> {
    let raw = read(path)?;
    parse_bank(&raw, path)
}

/// Parse a bank from its JSON text. `path` is only used for error messages.
///
/// # Errors
///
/// See [`load_bank`].
pub fn parse_bank(raw: &str, path: &Path) -> Result<Vec<Question>, ContentError> {
    let drafts: Vec<QuestionDraft> =
        serde_json::from_str(raw).map_err(|source| ContentError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    drafts
        .into_iter()
        .enumerate()
        .map(|(index, draft)| {
            draft.validate().map_err(|source| ContentError::InvalidQuestion {
                path: path.to_path_buf(),
                index,
                source,
            })
        })
        .collect()
}

fn read(path: &Path) -> Result<String, ContentError> {
    std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANK: &str = r#"[
        {"question": "Q1", "correctAnswer": "a", "options": ["a", "b"]},
        {"question": "Q2", "correctAnswer": "d", "options": ["c", "d", "e"]}
    ]"#;

    #[test]
    fn parses_a_valid_bank() {
        let bank = parse_bank(BANK, Path::new("bank.json")).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank[1].correct_answer(), "d");
    }

    #[test]
    fn reports_the_index_of_an_invalid_question() {
        let raw = r#"[
            {"question": "ok", "correctAnswer": "a", "options": ["a", "b"]},
            {"question": "bad", "correctAnswer": "z", "options": ["a", "b"]}
        ]"#;
        let err = parse_bank(raw, Path::new("bank.json")).unwrap_err();
        assert!(matches!(err, ContentError::InvalidQuestion { index: 1, .. }));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = parse_bank("{", Path::new("bank.json")).unwrap_err();
        assert!(matches!(err, ContentError::Json { .. }));
    }

    #[test]
    fn manifest_entry_defaults_file_name() {
        let entry: ManifestEntry = serde_json::from_str(r#"{"id":"android","title":"Android"}"#).unwrap();
        assert_eq!(entry.file_name(), "android.json");
    }
}
