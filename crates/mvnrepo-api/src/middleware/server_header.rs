//! # Server Identification
//!
//! Stamps `Server: mvnrepo/{version}` on every response, including
//! errors and unmatched routes.

use axum::extract::Request;
use axum::http::header::SERVER;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

/// Value of the `Server` header.
pub const SERVER_NAME: &str = concat!("mvnrepo/", env!("CARGO_PKG_VERSION"));

/// Axum middleware function that sets the `Server` header.
pub async fn server_header_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(SERVER, HeaderValue::from_static(SERVER_NAME));
    response
}
