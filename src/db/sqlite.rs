use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{
    db::{ReviewStore, Stamper, StoreError},
    models::{DeleteOutcome, NewReview, RatingSummary, Review, ReviewChanges, Variant},
    validation::{ensure_score_in_bounds, ensure_text_for_score},
};

const COLUMNS: &str = "id, subject_id, author_name, score, text, created_at";

/// Fixed-width RFC 3339 so that text ordering in SQLite matches time order.
fn stamp_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub struct SqliteStore {
    pool: SqlitePool,
    variant: Variant,
    table: &'static str,
    stamper: Stamper,
}

impl SqliteStore {
    pub async fn connect(url: &str, variant: Variant) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        // An in-memory database lives and dies with its connection.
        let mut pool_options = SqlitePoolOptions::new();
        if in_memory {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        Self::with_pool(pool, variant).await
    }

    pub async fn with_pool(pool: SqlitePool, variant: Variant) -> Result<Self, StoreError> {
        let table = variant.collection();
        let ddl = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject_id TEXT NOT NULL,
                author_name TEXT NOT NULL,
                score INTEGER NOT NULL CHECK (score >= {min} AND score <= {max}),
                text TEXT,
                created_at TEXT NOT NULL
            )",
            min = variant.min_score(),
            max = variant.max_score(),
        );
        sqlx::query(&ddl).execute(&pool).await?;
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_subject ON {table} (subject_id, created_at)"
        ))
        .execute(&pool)
        .await?;

        let last_stamp = sqlx::query_scalar::<_, Option<String>>(&format!(
            "SELECT MAX(created_at) FROM {table}"
        ))
        .fetch_one(&pool)
        .await?
        .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
        .map(|ts| ts.with_timezone(&Utc));

        tracing::info!("{} table ready", table);

        Ok(Self {
            pool,
            variant,
            table,
            stamper: Stamper::starting_at(last_stamp),
        })
    }
}

#[async_trait]
impl ReviewStore for SqliteStore {
    async fn create(&self, review: NewReview) -> Result<Review, StoreError> {
        ensure_text_for_score(review.score, review.text.as_deref())?;
        ensure_score_in_bounds(self.variant, review.score)?;

        let created_at = self.stamper.next();
        let record = sqlx::query_as::<_, Review>(&format!(
            "INSERT INTO {} (subject_id, author_name, score, text, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {COLUMNS}",
            self.table
        ))
        .bind(&review.subject_id)
        .bind(&review.author_name)
        .bind(review.score)
        .bind(&review.text)
        .bind(stamp_text(created_at))
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<Review>, StoreError> {
        let records = sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM {} ORDER BY created_at DESC, id DESC",
            self.table
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<Review>, StoreError> {
        let records = sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM {}
            WHERE subject_id = ?
            ORDER BY created_at DESC, id DESC",
            self.table
        ))
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn average_for(&self, subject_id: &str) -> Result<RatingSummary, StoreError> {
        let (average, count) = sqlx::query_as::<_, (Option<f64>, i64)>(&format!(
            "SELECT AVG(score), COUNT(*) FROM {} WHERE subject_id = ?",
            self.table
        ))
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(RatingSummary {
            average_rating: average.unwrap_or(0.0),
            total_ratings: count,
        })
    }

    async fn update(&self, id: i64, changes: ReviewChanges) -> Result<Review, StoreError> {
        ensure_text_for_score(changes.score, changes.text.as_deref())?;
        ensure_score_in_bounds(self.variant, changes.score)?;

        sqlx::query_as::<_, Review>(&format!(
            "UPDATE {} SET author_name = ?, score = ?, text = ?, created_at = ?
            WHERE id = ?
            RETURNING {COLUMNS}",
            self.table
        ))
        .bind(&changes.author_name)
        .bind(changes.score)
        .bind(&changes.text)
        .bind(stamp_text(self.stamper.next()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<DeleteOutcome, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = ?", self.table))
            .bind(id)
            .execute(&self.pool)
            .await?;

        match result.rows_affected() {
            0 => Err(StoreError::NotFound(id)),
            n => Ok(DeleteOutcome { deleted_count: n }),
        }
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}
