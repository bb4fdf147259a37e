use axum::body::Body;
use axum::http::request::Parts;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::AuthError;

/// A check run on every request before the wrapped handler.
///
/// On success a gate may annotate `parts` (for example by inserting
/// extensions). On failure the request is answered with the error and the
/// handler is never called.
pub trait Gate: Clone + Send + Sync + 'static {
    fn check(&self, parts: &mut Parts) -> Result<(), AuthError>;
}

/// Authentication layer.
#[derive(Clone)]
pub struct AuthLayer<G> {
    gate: Arc<G>,
}

impl<G: Gate> AuthLayer<G> {
    pub fn new(gate: G) -> Self {
        Self {
            gate: Arc::new(gate),
        }
    }
}

impl<S, G: Gate> Layer<S> for AuthLayer<G> {
    type Service = AuthService<S, G>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            gate: Arc::clone(&self.gate),
        }
    }
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService<S, G> {
    inner: S,
    gate: Arc<G>,
}

impl<S, G> Service<Request<Body>> for AuthService<S, G>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
    G: Gate,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let (mut parts, body) = req.into_parts();
        if let Err(e) = self.gate.check(&mut parts) {
            return Box::pin(async move { Ok(e.into_response()) });
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let req = Request::from_parts(parts, body);

        Box::pin(async move { inner.call(req).await })
    }
}

/// Extension trait for adding authentication to Router.
pub trait AuthExt {
    /// Add authentication middleware with a custom gate.
    fn with_gate<G: Gate>(self, gate: G) -> Self;

    /// Require HTTP basic credentials matching `user` and `password`.
    fn with_basic_auth(self, user: impl Into<String>, password: impl Into<String>) -> Self;

    /// Require a valid, unexpired bearer token signed by `codec`.
    #[cfg(feature = "jwt")]
    fn with_bearer_auth(self, codec: crate::TokenCodec) -> Self;
}

impl AuthExt for Router {
    fn with_gate<G: Gate>(self, gate: G) -> Self {
        self.layer(AuthLayer::new(gate))
    }

    fn with_basic_auth(self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.with_gate(crate::BasicAuth::new(user, password))
    }

    #[cfg(feature = "jwt")]
    fn with_bearer_auth(self, codec: crate::TokenCodec) -> Self {
        self.with_gate(crate::BearerAuth::new(codec))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};
    use axum::routing::get;
    use axum::Extension;
    use tower::ServiceExt;

    #[derive(Clone)]
    struct HeaderGate;

    #[derive(Clone, Debug, PartialEq)]
    struct Tenant(String);

    impl Gate for HeaderGate {
        fn check(&self, parts: &mut Parts) -> Result<(), AuthError> {
            let tenant = parts
                .headers
                .get("x-tenant")
                .and_then(|v| v.to_str().ok())
                .ok_or(AuthError::MissingToken)?
                .to_string();
            parts.extensions.insert(Tenant(tenant));
            Ok(())
        }
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(tenant): Extension<Tenant>| async move { tenant.0 }),
            )
            .with_gate(HeaderGate)
    }

    #[tokio::test]
    async fn rejection_short_circuits() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn annotations_reach_handler() {
        let mut req = Request::builder().uri("/").body(Body::empty()).unwrap();
        req.headers_mut()
            .insert("x-tenant", HeaderValue::from_static("acme"));

        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&body[..], b"acme");
    }
}
