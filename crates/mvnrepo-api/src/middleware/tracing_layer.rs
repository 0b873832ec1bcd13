//! # Request/Response Tracing
//!
//! One `request` span per HTTP request carrying the method, the artifact
//! path and the declared upload size. Query strings, headers and bodies
//! are not recorded. Responses are logged at INFO with latency in
//! milliseconds; 5xx responses are logged as failures.

use axum::http::header::CONTENT_LENGTH;
use axum::http::Request;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{Level, Span};

/// Span factory for artifact requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactSpan;

impl<B> MakeSpan<B> for ArtifactSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let content_length = request
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            content_length
        )
    }
}

/// The `TraceLayer` used by [`crate::app`].
pub type ArtifactTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    ArtifactSpan,
    DefaultOnRequest,
    DefaultOnResponse,
>;

/// Build the tracing layer for the repository server.
pub fn layer() -> ArtifactTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(ArtifactSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::put;
    use axum::Router;
    use tower::ServiceExt;

    #[tokio::test]
    async fn traced_requests_pass_through() {
        let app = Router::new()
            .route("/{*path}", put(|| async { StatusCode::CREATED }))
            .layer(layer());

        let request = Request::builder()
            .method("PUT")
            .uri("/com/x/lib/1.0/lib-1.0.jar?token=secret")
            .header(CONTENT_LENGTH, "3")
            .body(Body::from("abc"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn span_is_built_without_a_subscriber() {
        let request = Request::builder()
            .uri("/repositories/r1/com/x/lib/1.0/lib-1.0.jar")
            .body(())
            .unwrap();
        let _span = ArtifactSpan.make_span(&request);
    }
}
