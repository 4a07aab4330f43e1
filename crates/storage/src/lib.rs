#![forbid(unsafe_code)]

pub mod content;
pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryStore, KeyValueStore, KvProgressRepository, PROGRESS_KEY, ProgressRepository,
    Storage, StorageError,
};
