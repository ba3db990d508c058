use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::config::{BAD_REQUEST_BODY, FORBIDDEN_BODY, METHOD_NOT_ALLOWED_BODY};
use crate::response;

/// Per-request failures. None of these escape the request that raised them.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{}", METHOD_NOT_ALLOWED_BODY)]
    MethodNotAllowed,

    #[error("{}", FORBIDDEN_BODY)]
    Forbidden,

    #[error("{}", BAD_REQUEST_BODY)]
    BadRequest,

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(message) => {
                tracing::error!("Internal error: {:?}", self);
                response::internal_error(message)
            }
            _ => {
                tracing::debug!(status = status.as_u16(), "Request rejected");
                response::text(status, self.to_string())
            }
        }
    }
}
