//! Request pipeline middleware.
//!
//! - `request_id_layer` wraps every request in a span carrying a UUID v4 so all logs
//!   for one request correlate.
//! - `normalize_request` enforces GET-only and lower-cases the path before routing.
//! - `panic_response` turns a panicking handler into a 500 instead of a dropped
//!   connection.

use std::any::Any;
use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request},
    http::{uri::PathAndQuery, Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::response;

/// Middleware that generates a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
pub async fn request_id_layer(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        peer = %peer,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();

    async move {
        let response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await
}

/// Reject non-GET methods and lower-case the request path.
///
/// Must run before routing so the lower-cased path is what the router matches.
pub async fn normalize_request(mut request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return AppError::MethodNotAllowed.into_response();
    }

    let path = request.uri().path();
    if path.bytes().any(|b| b.is_ascii_uppercase()) {
        match lowercase_path(request.uri()) {
            Ok(uri) => *request.uri_mut() = uri,
            Err(e) => return AppError::Internal(e).into_response(),
        }
    }

    next.run(request).await
}

fn lowercase_path(uri: &Uri) -> Result<Uri, String> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", uri.path().to_ascii_lowercase(), query),
        None => uri.path().to_ascii_lowercase(),
    };

    let mut parts = uri.clone().into_parts();
    let path_and_query = path_and_query
        .parse::<PathAndQuery>()
        .map_err(|e| e.to_string())?;
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).map_err(|e| e.to_string())
}

/// Panic handler for `CatchPanicLayer`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %message, "Request handler panicked");
    response::internal_error(&message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_path_keeps_query() {
        let uri: Uri = "/Admin/Set-Health?state=Healthy".parse().unwrap();
        let lowered = lowercase_path(&uri).unwrap();
        assert_eq!(lowered.path(), "/admin/set-health");
        assert_eq!(lowered.query(), Some("state=Healthy"));
    }

    #[test]
    fn test_lowercase_path_absolute_form() {
        let uri: Uri = "http://Example.com:8080/HEALTHZ".parse().unwrap();
        let lowered = lowercase_path(&uri).unwrap();
        assert_eq!(lowered.path(), "/healthz");
        assert_eq!(lowered.host(), Some("Example.com"));
    }

    #[test]
    fn test_panic_response_uses_message() {
        let response = panic_response(Box::new("kaboom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[axum::http::header::CONNECTION], "close");

        let response = panic_response(Box::new(String::from("owned kaboom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
