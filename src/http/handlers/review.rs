use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    errors::AppError,
    models::{DeleteOutcome, Review, ReviewPayload, Variant},
    state::AppState,
    validation::{parse_record_id, parse_subject_id, validate_create, validate_update},
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRatings {
    pub ratings: Vec<Review>,
    pub average_rating: f64,
    pub total_ratings: i64,
}

/// A rating with its project's display name, as the rating board lists them.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribedReview {
    #[serde(flatten)]
    pub review: Review,
    pub subject_description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    #[serde(flatten)]
    pub outcome: DeleteOutcome,
    pub message: String,
}

fn body(payload: Result<Json<ReviewPayload>, JsonRejection>) -> Result<ReviewPayload, AppError> {
    payload.map(|Json(p)| p).map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        AppError::BadRequest("Malformed JSON body".into())
    })
}

fn record_id(raw: &str, variant: Variant) -> Result<i64, AppError> {
    parse_record_id(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Invalid {} ID", variant.noun().to_lowercase())))
}

pub async fn create_review_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let variant = state.variant;
    let draft = validate_create(variant, &body(payload)?).map_err(|e| {
        tracing::warn!("Rejected {} create: {}", variant, e);
        AppError::from(e)
    })?;

    let review = state.store.create(draft).await.map_err(|e| {
        tracing::error!("Error saving {}: {}", variant, e);
        AppError::from_store("Failed to save review", variant.noun(), e)
    })?;

    tracing::info!(
        "{} {} saved for subject {}",
        variant.noun(),
        review.id,
        review.subject_id
    );
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn list_reviews_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let variant = state.variant;
    let reviews = state.store.list_all().await.map_err(|e| {
        tracing::error!("Error getting all {}s: {}", variant, e);
        AppError::from_store("Failed to fetch reviews", variant.noun(), e)
    })?;

    tracing::info!("Retrieved {} {}s", reviews.len(), variant);

    match variant {
        Variant::Review => Ok(Json(reviews).into_response()),
        Variant::Rating => {
            let described: Vec<DescribedReview> = reviews
                .into_iter()
                .map(|review| DescribedReview {
                    subject_description: state
                        .catalog
                        .describe(&review.subject_id)
                        .map(str::to_string),
                    review,
                })
                .collect();
            Ok(Json(described).into_response())
        }
    }
}

/// The rating board also reports the subject's average; the review board
/// returns the bare list.
pub async fn list_subject_reviews_handler(
    State(state): State<AppState>,
    Path(raw_subject): Path<String>,
) -> Result<Response, AppError> {
    let variant = state.variant;
    let subject_id = parse_subject_id(&raw_subject).ok_or_else(|| {
        tracing::warn!("Invalid subject id: {:?}", raw_subject);
        AppError::BadRequest("Invalid subject ID".into())
    })?;

    let reviews = state
        .store
        .list_by_subject(&subject_id)
        .await
        .map_err(|e| {
            tracing::error!("Error getting {}s for {}: {}", variant, subject_id, e);
            AppError::from_store("Failed to fetch reviews for this subject", variant.noun(), e)
        })?;

    tracing::info!(
        "Retrieved {} {}s for subject {}",
        reviews.len(),
        variant,
        subject_id
    );

    match variant {
        Variant::Review => Ok(Json(reviews).into_response()),
        Variant::Rating => {
            let summary = state.store.average_for(&subject_id).await.map_err(|e| {
                tracing::error!("Error averaging ratings for {}: {}", subject_id, e);
                AppError::from_store("Failed to get ratings", variant.noun(), e)
            })?;

            Ok(Json(SubjectRatings {
                ratings: reviews,
                average_rating: summary.average_rating,
                total_ratings: summary.total_ratings,
            })
            .into_response())
        }
    }
}

pub async fn update_review_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<ReviewPayload>, JsonRejection>,
) -> Result<Json<Review>, AppError> {
    let variant = state.variant;
    let id = record_id(&raw_id, variant)?;
    let changes = validate_update(variant, &body(payload)?).map_err(|e| {
        tracing::warn!("Rejected {} update for {}: {}", variant, id, e);
        AppError::from(e)
    })?;

    let review = state.store.update(id, changes).await.map_err(|e| {
        tracing::error!("Error updating {} {}: {}", variant, id, e);
        AppError::from_store("Failed to update review", variant.noun(), e)
    })?;

    tracing::info!("{} {} updated", variant.noun(), id);
    Ok(Json(review))
}

pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let variant = state.variant;
    let id = record_id(&raw_id, variant)?;

    let outcome = state.store.delete(id).await.map_err(|e| {
        tracing::error!("Error deleting {} {}: {}", variant, id, e);
        AppError::from_store("Failed to delete review", variant.noun(), e)
    })?;

    tracing::info!("{} {} deleted", variant.noun(), id);
    Ok(Json(DeleteResponse {
        outcome,
        message: format!("{} deleted successfully", variant.noun()),
    }))
}
