use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::ApiResponse;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    /// Caller-fixable input problem; the message is returned verbatim.
    #[error("{0}")]
    Validation(String),

    /// Anything else. Only `message` leaves the process; `detail` is logged.
    #[error("{message}: {detail}")]
    Internal { message: &'static str, detail: String },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn internal(message: &'static str, detail: impl Into<String>) -> Self {
        AppError::Internal {
            message,
            detail: detail.into(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message, detail } => {
                tracing::error!(error = %detail, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(ApiResponse::<()>::failure(message))).into_response()
    }
}
