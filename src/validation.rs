use thiserror::Error;

use crate::models::{NewReview, ReviewChanges, ReviewPayload, Variant};

const MAX_SUBJECT_ID_LEN: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Rating must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64, got: i64 },

    #[error("User name must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Invalid subject ID")]
    InvalidSubject,
}

/// Fields the author and score rules check, shared by create and update.
struct Checked {
    author_name: String,
    score: i64,
    text: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Rules run in precedence order: presence, then range, then length. The
/// first failure wins.
fn check_fields(
    variant: Variant,
    payload: &ReviewPayload,
    subject_missing: bool,
) -> Result<Checked, ValidationError> {
    if subject_missing {
        return Err(ValidationError::MissingField("subjectId"));
    }
    let author_name = non_blank(payload.author_name.as_deref())
        .ok_or(ValidationError::MissingField("authorName"))?;
    let score = payload.score.ok_or(ValidationError::MissingField("score"))?;
    let text = non_blank(payload.text.as_deref());
    if text.is_none() && variant.requires_text(score) {
        return Err(ValidationError::MissingField("text"));
    }

    ensure_score_in_bounds(variant, score)?;

    let min_len = variant.min_author_len();
    if author_name.chars().count() < min_len {
        return Err(ValidationError::TooShort { min: min_len });
    }

    Ok(Checked {
        author_name,
        score,
        text,
    })
}

pub fn validate_create(
    variant: Variant,
    payload: &ReviewPayload,
) -> Result<NewReview, ValidationError> {
    let subject = payload.subject_id.as_ref().map(|s| s.normalized());
    let subject_missing = subject.as_deref().is_none_or(str::is_empty);

    let checked = check_fields(variant, payload, subject_missing)?;

    // Same shape rule as the listing route, so every stored subject can be listed.
    let subject_id = subject
        .as_deref()
        .and_then(parse_subject_id)
        .ok_or(ValidationError::InvalidSubject)?;

    Ok(NewReview {
        subject_id,
        author_name: checked.author_name,
        score: checked.score,
        text: checked.text,
    })
}

/// Updates never move a review to another subject, so `subjectId` is ignored.
pub fn validate_update(
    variant: Variant,
    payload: &ReviewPayload,
) -> Result<ReviewChanges, ValidationError> {
    let checked = check_fields(variant, payload, false)?;

    Ok(ReviewChanges {
        author_name: checked.author_name,
        score: checked.score,
        text: checked.text,
    })
}

/// Store-side guard: a zero (or lower) score is only meaningful with a comment.
pub fn ensure_text_for_score(score: i64, text: Option<&str>) -> Result<(), ValidationError> {
    if score <= 0 && non_blank(text).is_none() {
        return Err(ValidationError::MissingField("text"));
    }
    Ok(())
}

/// Store-side guard: the score must sit inside the variant's scale.
pub fn ensure_score_in_bounds(variant: Variant, score: i64) -> Result<(), ValidationError> {
    let (min, max) = (variant.min_score(), variant.max_score());
    if score < min || score > max {
        return Err(ValidationError::OutOfRange {
            min,
            max,
            got: score,
        });
    }
    Ok(())
}

pub fn parse_subject_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.len() > MAX_SUBJECT_ID_LEN
        || trimmed.chars().any(char::is_control)
    {
        return None;
    }
    Some(trimmed.to_string())
}

pub fn parse_record_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
