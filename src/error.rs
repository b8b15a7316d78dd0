use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    /// Seed title absent from the catalog index; recoverable, callers should
    /// fall back to cold-start content
    #[error("Title not found: {0}")]
    TitleNotFound(String),

    /// Rating outside [1, 5]; rejected before any state mutation
    #[error("Invalid rating {0}: must be an integer between 1 and 5")]
    InvalidRating(i64),

    /// Similarity index built from a catalog snapshot with zero items
    #[error("Catalog snapshot has no items")]
    EmptyCatalog,

    /// Collaborative model built from a ratings table with zero rows
    #[error("Ratings table has no rows")]
    EmptyRatings,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Profile store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::TitleNotFound(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRating(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyCatalog
            | AppError::EmptyRatings
            | AppError::Store(_)
            | AppError::Serde(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
