use axum::{
    Json, Router,
    http::StatusCode,
    routing::get,
};
use serde_json::json;

use crate::{
    http::handlers::{
        create_review_handler, delete_review_handler, health_handler, list_reviews_handler,
        list_subject_reviews_handler, update_review_handler,
    },
    state::AppState,
};

/// `{key}` is a subject id for GET and a record id for PUT and DELETE.
pub fn create_http_routes(state: AppState) -> Router {
    let prefix = state.variant.route_prefix();

    Router::new()
        .route(
            prefix,
            get(list_reviews_handler).post(create_review_handler),
        )
        .route(
            &format!("{prefix}/{{key}}"),
            get(list_subject_reviews_handler)
                .put(update_review_handler)
                .delete(delete_review_handler),
        )
        .route("/health", get(health_handler))
        .method_not_allowed_fallback(|| async {
            (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(json!({ "error": "Method not allowed" })),
            )
        })
        .fallback(|| async { (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" }))) })
        .with_state(state)
}
