use std::fs;

use storage::content::{ContentError, DEFAULT_SUBJECTS, MANIFEST_FILE, load_subjects};

fn bank_json(n: usize) -> String {
    let items: Vec<String> = (0..n)
        .map(|i| {
            format!(r#"{{"question":"Q{i}","correctAnswer":"a{i}","options":["a{i}","b{i}"]}}"#)
        })
        .collect();
    format!("[{}]", items.join(","))
}

#[test]
fn loads_default_subjects_without_manifest() {
    let dir = tempfile::tempdir().unwrap();
    for (i, (id, _)) in DEFAULT_SUBJECTS.iter().enumerate() {
        fs::write(dir.path().join(format!("{id}.json")), bank_json(i + 1)).unwrap();
    }

    let subjects = load_subjects(dir.path()).unwrap();
    assert_eq!(subjects.len(), 4);
    assert_eq!(subjects[0].id().as_str(), "cyberSecurity");
    assert_eq!(subjects[3].questions().len(), 4);
}

#[test]
fn manifest_selects_subjects_and_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(MANIFEST_FILE),
        r#"[{"id":"rust","title":"Rust","file":"rust-bank.json"}]"#,
    )
    .unwrap();
    fs::write(dir.path().join("rust-bank.json"), bank_json(35)).unwrap();

    let subjects = load_subjects(dir.path()).unwrap();
    assert_eq!(subjects.len(), 1);
    assert_eq!(subjects[0].title(), "Rust");
    assert_eq!(subjects[0].questions().len(), 35);
}

#[test]
fn missing_bank_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_subjects(dir.path()).unwrap_err();
    assert!(matches!(err, ContentError::Io { .. }));
}
