use axum::extract::ConnectInfo;
use axum::http::{header, Request};
use std::net::SocketAddr;
use tower::Layer;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{MakeSpan, OnRequest, TraceLayer},
};
use tracing::Span;

/// Span carrying method, path and request ID.
#[derive(Clone, Copy)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "http",
            method = %request.method(),
            path = %request.uri().path(),
            request_id = %request_id,
        )
    }
}

/// Emits the single `HTTP request` record.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogRequest;

impl<B> OnRequest<B> for LogRequest {
    fn on_request(&mut self, request: &Request<B>, _span: &Span) {
        let headers = request.headers();
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string()
        };

        let host = request
            .uri()
            .authority()
            .map(|a| a.to_string())
            .unwrap_or_else(|| header_str(header::HOST.as_str()));
        let address = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_default();

        tracing::info!(
            host = %host,
            address = %address,
            method = %request.method(),
            request_uri = %request.uri(),
            proto = ?request.version(),
            user_agent = %header_str(header::USER_AGENT.as_str()),
            request_id = %header_str("x-request-id"),
            "HTTP request"
        );
    }
}

/// Inner type alias for the configured TraceLayer.
pub type InnerTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan, LogRequest, ()>;

/// Request logging decorator.
///
/// Logs one INFO record per request (host, remote address, method, URI,
/// protocol, user agent, `X-Request-ID`) and always calls the inner service.
#[derive(Clone, Copy, Default)]
pub struct RequestLogLayer;

impl RequestLogLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for RequestLogLayer {
    type Service = <InnerTraceLayer as Layer<S>>::Service;

    fn layer(&self, inner: S) -> Self::Service {
        TraceLayer::new_for_http()
            .make_span_with(RequestSpan)
            .on_request(LogRequest)
            .on_response(())
            .layer(inner)
    }
}
