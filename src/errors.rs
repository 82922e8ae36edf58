use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{db::StoreError, validation::ValidationError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// `context` is the client-facing message; `source` is logged only.
    #[error("{context}: {source}")]
    Store {
        context: &'static str,
        source: StoreError,
    },

    #[error("Env error: {0}")]
    EnvError(String),

    #[error("Internal server error")]
    InternalError,
}

impl AppError {
    /// Translate a store failure, keeping client input and missing-record
    /// errors visible and hiding everything else behind `context`.
    pub fn from_store(context: &'static str, noun: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(format!("{noun} not found")),
            StoreError::Validation(e) => AppError::Validation(e),
            source => AppError::Store { context, source },
        }
    }

    pub fn to_response(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Store { context, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, (*context).to_string())
            }
            AppError::EnvError(_) | AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unexpected server error".into(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.to_response();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
