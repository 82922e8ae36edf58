pub mod json_file;
pub mod sqlite;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    config::{Backend, Config},
    models::{DeleteOutcome, NewReview, RatingSummary, Review, ReviewChanges},
    validation::ValidationError,
};

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record ids exhausted")]
    IdsExhausted,
}

/// Persistence contract shared by the file and SQLite backends.
///
/// Listings are newest first (`created_at` descending, then `id`
/// descending). Every mutation is durable once it returns `Ok` and is never
/// partially applied when it returns `Err`.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn create(&self, review: NewReview) -> Result<Review, StoreError>;

    async fn list_all(&self) -> Result<Vec<Review>, StoreError>;

    async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<Review>, StoreError>;

    async fn average_for(&self, subject_id: &str) -> Result<RatingSummary, StoreError>;

    async fn update(&self, id: i64, changes: ReviewChanges) -> Result<Review, StoreError>;

    async fn delete(&self, id: i64) -> Result<DeleteOutcome, StoreError>;

    async fn close(&self) {}
}

/// Hands out creation timestamps that never go backwards, even if the
/// system clock does.
#[derive(Debug, Default)]
pub struct Stamper {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl Stamper {
    pub fn starting_at(last: Option<DateTime<Utc>>) -> Self {
        Self {
            last: Mutex::new(last),
        }
    }

    pub fn next(&self) -> DateTime<Utc> {
        let now = truncate_micros(Utc::now());
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        let stamp = match *last {
            Some(prev) if prev > now => prev,
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

/// Stored timestamps keep microsecond precision so both backends round-trip
/// the same value.
fn truncate_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(ts.timestamp_micros()).unwrap_or(ts)
}

pub(crate) fn newest_first(a: &Review, b: &Review) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

/// Open the backend the configuration asks for.
pub async fn open_store(config: &Config) -> Result<Arc<dyn ReviewStore>, StoreError> {
    match config.backend {
        Backend::JsonFile => {
            let store = JsonFileStore::open(config.json_path(), config.variant).await?;
            Ok(Arc::new(store))
        }
        Backend::Sqlite => {
            if config.database_url.is_none() {
                tokio::fs::create_dir_all(&config.data_dir).await?;
            }
            let store = SqliteStore::connect(&config.sqlite_url(), config.variant).await?;
            Ok(Arc::new(store))
        }
    }
}
