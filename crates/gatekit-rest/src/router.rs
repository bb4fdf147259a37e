//! Router extension traits for axum-like API.

use axum::Router;
use gatekit_auth::AuthExt;

use crate::layer::{CorsLayer, RequestLogLayer};
use crate::SecurityConfig;

/// Extension trait for Router that composes the request chain.
///
/// Requests flow CORS → request log → auth → handler. Since the last layer
/// added is the outermost, [`with_security`](RouterExt::with_security)
/// applies them in reverse.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get};
/// use gatekit_rest::RouterExt;
///
/// let app = Router::new()
///     .route("/api/items", get(list_items))
///     .with_security(&config);
/// ```
pub trait RouterExt: Sized {
    /// Adds permissive CORS headers to every response.
    fn with_cors(self) -> Self;

    /// Logs one record per request.
    fn with_request_log(self) -> Self;

    /// Applies auth, request logging and CORS as configured.
    ///
    /// Bearer auth is used when `jwt_secret` is set, otherwise basic auth
    /// when `basic_auth` is set, otherwise no gate.
    fn with_security(self, config: &impl AsRef<SecurityConfig>) -> Self;
}

impl RouterExt for Router {
    fn with_cors(self) -> Self {
        self.layer(CorsLayer::new())
    }

    fn with_request_log(self) -> Self {
        self.layer(RequestLogLayer::new())
    }

    fn with_security(self, config: &impl AsRef<SecurityConfig>) -> Self {
        let config = config.as_ref();
        let mut router = self;

        #[cfg(feature = "jwt")]
        let bearer = config.token_codec();
        #[cfg(not(feature = "jwt"))]
        let bearer: Option<std::convert::Infallible> = None;

        match (bearer, &config.basic_auth) {
            #[cfg(feature = "jwt")]
            (Some(codec), basic) => {
                if basic.is_some() {
                    tracing::warn!("both jwt_secret and basic_auth configured, using bearer auth");
                }
                router = router.with_bearer_auth(codec);
            }
            (None, Some(basic)) => router = router.with_gate(basic.clone()),
            _ => tracing::warn!("no authentication configured"),
        }

        if config.log_requests {
            router = router.with_request_log();
        }
        if config.cors {
            router = router.with_cors();
        }
        router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::get;
    use gatekit_auth::BasicAuth;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn request(authorization: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn cors_wraps_auth_rejections() {
        let config = SecurityConfig {
            basic_auth: Some(BasicAuth::new("user", "pass")),
            ..Default::default()
        };
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_security(&config);

        let response = app.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Basic realm=Restricted"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Unauthorized");
    }

    #[tokio::test]
    async fn basic_auth_admits_matching_credentials() {
        let config = SecurityConfig {
            basic_auth: Some(BasicAuth::new("user", "pass")),
            ..Default::default()
        };
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_security(&config);

        let response = app
            .oneshot(request(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[cfg(feature = "jwt")]
    #[tokio::test]
    async fn bearer_takes_precedence_over_basic() {
        use gatekit_auth::{unix_now, TokenCodec};

        let config = SecurityConfig {
            jwt_secret: Some("s3cret".to_string()),
            basic_auth: Some(BasicAuth::new("user", "pass")),
            ..Default::default()
        };
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .with_security(&config);

        let response = app
            .clone()
            .oneshot(request(Some("Basic dXNlcjpwYXNz")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = TokenCodec::new("s3cret")
            .create(&serde_json::json!({"exp": unix_now() + 60}))
            .unwrap();
        let response = app
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn decorators_can_be_disabled() {
        let config = SecurityConfig {
            cors: false,
            log_requests: false,
            ..Default::default()
        };
        let app = Router::new()
            .route("/", get(|| async { "open" }))
            .with_security(&config);

        let response = app.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
