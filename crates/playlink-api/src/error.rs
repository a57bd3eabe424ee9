use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use playlink_types::api::ErrorResponse;

/// Errors on the game-client JSON endpoints. Store failures pass their
/// message through, matching the API contract.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing fields")]
    MissingFields,

    #[error("{0}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::Store(e) => {
                error!("store error: {e:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Errors on the website HTML/text endpoints. Store failures render a
/// generic message; details stay in the logs.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Missing fields")]
    MissingFields,

    #[error("Invalid code")]
    InvalidCode,

    #[error("User not found")]
    NotFound,

    #[error("DB Error")]
    Store(#[source] anyhow::Error),
}

impl From<anyhow::Error> for PageError {
    fn from(e: anyhow::Error) -> Self {
        PageError::Store(e)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let status = match &self {
            PageError::MissingFields | PageError::InvalidCode => StatusCode::BAD_REQUEST,
            PageError::NotFound => StatusCode::NOT_FOUND,
            PageError::Store(e) => {
                error!("store error: {e:#}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
