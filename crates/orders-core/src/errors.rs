use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orders_types::ports::product_validator::CatalogError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Upstream catalog failure: {0}")]
    Upstream(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        // The collaborator's own message travels through untouched.
        AppError::Upstream(e.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            AppError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            AppError::Upstream(m) => (StatusCode::BAD_GATEWAY, m.clone()),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into()),
        };

        let body = serde_json::to_string(&ErrorBody {
            error: msg,
            status: code.as_u16(),
        })
        .unwrap_or_else(|_| "{\"error\":\"internal serialization\"}".into());
        (code, [("content-type", "application/json")], body).into_response()
    }
}
