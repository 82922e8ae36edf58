use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub subject_id: String,
    pub author_name: String,
    pub score: i64,
    pub text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// A zero score on the rating scale carries no rating, only the comment.
    pub fn is_text_only(&self) -> bool {
        self.score == 0
    }
}

/// A validated review that has not been given an id or timestamp yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub subject_id: String,
    pub author_name: String,
    pub score: i64,
    pub text: Option<String>,
}

/// Replacement values for the mutable fields of a stored review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewChanges {
    pub author_name: String,
    pub score: i64,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub total_ratings: i64,
}

impl RatingSummary {
    pub fn empty() -> Self {
        Self {
            average_rating: 0.0,
            total_ratings: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}
