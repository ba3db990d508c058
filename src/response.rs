//! Response builders with explicit content types and lengths.
//!
//! Probes and scripts hitting this service compare headers literally, so bodies
//! always carry a `charset=utf-8` content type and a `Content-Length`.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::Response,
};
use serde::Serialize;

use crate::error::AppError;

pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";

/// Plain-text response.
pub fn text(status: StatusCode, body: impl Into<String>) -> Response {
    build(status, TEXT_PLAIN_UTF8, body.into().into_bytes())
}

/// 500 response for a fault while handling a request. The connection is closed
/// after the response is written.
pub fn internal_error(message: &str) -> Response {
    let mut response = text(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Internal Server Error: {}", message),
    );
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

/// JSON response from any serializable value.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, AppError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| AppError::Internal(format!("failed to encode JSON: {}", e)))?;
    Ok(build(status, APPLICATION_JSON_UTF8, bytes))
}

fn build(status: StatusCode, content_type: &'static str, bytes: Vec<u8>) -> Response {
    let length = bytes.len();
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    response
}
