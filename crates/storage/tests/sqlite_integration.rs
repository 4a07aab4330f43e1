use quiz_core::model::{ProgressMap, SubjectId, TestId};
use storage::repository::{KeyValueStore, PROGRESS_KEY, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_kv_round_trips_and_overwrites() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.get("missing").await.unwrap(), None);

    repo.set("greeting", "hello").await.unwrap();
    repo.set("greeting", "bonjour").await.unwrap();
    assert_eq!(repo.get("greeting").await.unwrap().as_deref(), Some("bonjour"));
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn sqlite_storage_persists_progress_mapping() {
    let storage = Storage::sqlite("sqlite:file:memdb_progress?mode=memory&cache=shared")
        .await
        .expect("storage");

    let mut map = ProgressMap::new();
    map.record(&SubjectId::new("android"), TestId::new(2), 18, 30);
    map.record(&SubjectId::new("inclusion"), TestId::new(11), 30, 30);
    storage.progress.save(&map).await.unwrap();

    let loaded = storage.progress.load().await.unwrap().expect("saved mapping");
    assert_eq!(loaded, map);

    let raw = storage.kv.get(PROGRESS_KEY).await.unwrap().unwrap();
    assert!(raw.starts_with('{'));
}

#[tokio::test]
async fn sqlite_creates_missing_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz.sqlite3");
    assert!(!path.exists());

    let url = format!("sqlite://{}", path.display());
    let storage = Storage::sqlite(&url).await.expect("storage");
    storage.kv.set(PROGRESS_KEY, "{}").await.unwrap();

    assert!(path.exists());
}
