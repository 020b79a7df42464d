use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::{DataFetchError, SeedGuardError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Fetch(#[from] DataFetchError),
    #[error("Invoice not found.")]
    InvoiceNotFound,
    #[error(transparent)]
    Forbidden(#[from] SeedGuardError),
    /// The seed write itself failed; its message is reported as-is
    #[error("{0}")]
    Seed(anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct StatusBody {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        match self {
            ApiError::Fetch(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: message }),
            )
                .into_response(),
            ApiError::InvoiceNotFound => {
                (StatusCode::NOT_FOUND, Json(ErrorBody { error: message })).into_response()
            }
            ApiError::Forbidden(_) => (
                StatusCode::FORBIDDEN,
                Json(StatusBody {
                    status: "error",
                    message,
                }),
            )
                .into_response(),
            ApiError::Seed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(StatusBody {
                    status: "error",
                    message,
                }),
            )
                .into_response(),
        }
    }
}
