use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    db::{ReviewStore, Stamper, StoreError, newest_first},
    models::{DeleteOutcome, NewReview, RatingSummary, Review, ReviewChanges, Variant},
    validation::{ensure_score_in_bounds, ensure_text_for_score},
};

/// Monotonic id source for the file backend. Resumes after the largest id
/// found on disk and never hands the same value out twice.
#[derive(Debug)]
pub struct IdSequence {
    next: i64,
}

impl IdSequence {
    pub fn after(records: &[Review]) -> Result<Self, StoreError> {
        let max = records.iter().map(|r| r.id).max().unwrap_or(0);
        let next = max.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        Ok(Self { next })
    }

    pub fn next_id(&mut self) -> Result<i64, StoreError> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or(StoreError::IdsExhausted)?;
        Ok(id)
    }
}

struct Inventory {
    records: Vec<Review>,
    ids: IdSequence,
}

/// Keeps every review in memory as one ordered sequence and rewrites the
/// whole JSON document on each mutation.
///
/// Writers are serialized by the inner mutex. The document itself is
/// replaced in place, so a crash part-way through a write can leave it
/// truncated; two processes pointed at the same file will overwrite each
/// other's changes.
pub struct JsonFileStore {
    path: PathBuf,
    variant: Variant,
    inventory: Mutex<Inventory>,
    stamper: Stamper,
}

impl JsonFileStore {
    pub async fn open(path: impl AsRef<Path>, variant: Variant) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"[]").await?;
            tracing::info!("Created empty review file at {}", path.display());
        }

        let raw = tokio::fs::read(&path).await?;
        let records: Vec<Review> = serde_json::from_slice(&raw)?;
        let last_stamp = records.iter().map(|r| r.created_at).max();
        let ids = IdSequence::after(&records)?;

        tracing::info!(
            "Loaded {} records from {}",
            records.len(),
            path.display()
        );

        Ok(Self {
            path,
            variant,
            inventory: Mutex::new(Inventory { records, ids }),
            stamper: Stamper::starting_at(last_stamp),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[Review]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }

    async fn select<F>(&self, keep: F) -> Vec<Review>
    where
        F: Fn(&Review) -> bool,
    {
        let inventory = self.inventory.lock().await;
        let mut matched: Vec<Review> = inventory
            .records
            .iter()
            .filter(|r| keep(*r))
            .cloned()
            .collect();
        matched.sort_by(newest_first);
        matched
    }
}

#[async_trait]
impl ReviewStore for JsonFileStore {
    async fn create(&self, review: NewReview) -> Result<Review, StoreError> {
        ensure_text_for_score(review.score, review.text.as_deref())?;
        ensure_score_in_bounds(self.variant, review.score)?;

        let mut inventory = self.inventory.lock().await;
        let record = Review {
            id: inventory.ids.next_id()?,
            subject_id: review.subject_id,
            author_name: review.author_name,
            score: review.score,
            text: review.text,
            created_at: self.stamper.next(),
        };

        let mut next = inventory.records.clone();
        next.push(record.clone());
        self.persist(&next).await?;
        inventory.records = next;

        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<Review>, StoreError> {
        Ok(self.select(|_| true).await)
    }

    async fn list_by_subject(&self, subject_id: &str) -> Result<Vec<Review>, StoreError> {
        Ok(self.select(|r| r.subject_id == subject_id).await)
    }

    async fn average_for(&self, subject_id: &str) -> Result<RatingSummary, StoreError> {
        let inventory = self.inventory.lock().await;
        let (total, count) = inventory
            .records
            .iter()
            .filter(|r| r.subject_id == subject_id)
            .fold((0i64, 0i64), |(sum, n), r| (sum + r.score, n + 1));

        if count == 0 {
            return Ok(RatingSummary::empty());
        }

        Ok(RatingSummary {
            average_rating: total as f64 / count as f64,
            total_ratings: count,
        })
    }

    async fn update(&self, id: i64, changes: ReviewChanges) -> Result<Review, StoreError> {
        ensure_text_for_score(changes.score, changes.text.as_deref())?;
        ensure_score_in_bounds(self.variant, changes.score)?;

        let mut inventory = self.inventory.lock().await;
        let index = inventory
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut next = inventory.records.clone();
        let record = &mut next[index];
        record.author_name = changes.author_name;
        record.score = changes.score;
        record.text = changes.text;
        record.created_at = self.stamper.next();
        let updated = record.clone();

        self.persist(&next).await?;
        inventory.records = next;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<DeleteOutcome, StoreError> {
        let mut inventory = self.inventory.lock().await;
        let index = inventory
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let mut next = inventory.records.clone();
        next.remove(index);
        self.persist(&next).await?;
        inventory.records = next;

        Ok(DeleteOutcome { deleted_count: 1 })
    }
}
