//! Uniform translation of handler failures into JSON HTTP responses.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;

/// Boxed underlying cause carried by a [`HandlerError`].
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Result type for handlers whose failures go through the error responder.
pub type HandlerResult<T = Response> = Result<T, HandlerError>;

/// Body written when the error payload itself cannot be serialized.
const FALLBACK_BODY: &str = "Internal Server Error";

/// Trait for converting errors into HTTP responses.
///
/// # Example
///
/// ```ignore
/// use gatekit::HttpError;
/// use axum::http::StatusCode;
///
/// #[derive(Debug)]
/// struct NotFound;
///
/// impl HttpError for NotFound {
///     fn status_code(&self) -> StatusCode {
///         StatusCode::NOT_FOUND
///     }
///
///     fn message(&self) -> &str {
///         "Resource not found"
///     }
/// }
/// ```
pub trait HttpError: fmt::Debug {
    fn status_code(&self) -> StatusCode;
    fn message(&self) -> &str;

    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        render_json(status, &ErrorResponse::new(self.message(), status))
    }
}

/// Wire format of every error body: `{"message": ..., "code": ...}`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            message: message.into(),
            code: status.as_u16(),
        }
    }

    /// Uses the canonical reason phrase as the message.
    pub fn from_status(status: StatusCode) -> Self {
        Self::new(status.canonical_reason().unwrap_or("Error"), status)
    }
}

/// Failure returned by a handler or middleware.
///
/// The cause is logged but never written to the client.
///
/// ```ignore
/// async fn show(Path(id): Path<u64>) -> HandlerResult {
///     let item = store.get(id).map_err(|e| {
///         HandlerError::new(e, StatusCode::NOT_FOUND, format!("item {id} not found"))
///     })?;
///     write_json(&item)
/// }
/// ```
pub struct HandlerError {
    cause: Option<BoxError>,
    message: String,
    status: StatusCode,
}

impl HandlerError {
    pub fn new(cause: impl Into<BoxError>, status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            cause: Some(cause.into()),
            message: message.into(),
            status,
        }
    }

    /// An error without an underlying cause, using the reason phrase as message.
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            cause: None,
            message: status.canonical_reason().unwrap_or("Error").to_string(),
            status,
        }
    }

    /// Generic 500 wrapping an internal failure.
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        Self::new(cause, status, status.canonical_reason().unwrap_or("Error"))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerError")
            .field("status", &self.status)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{} ({}): {}", self.message, self.status, cause),
            None => write!(f, "{} ({})", self.message, self.status),
        }
    }
}

impl StdError for HandlerError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|c| c as &(dyn StdError + 'static))
    }
}

impl HttpError for HandlerError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn message(&self) -> &str {
        &self.message
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let underlying = self
            .cause
            .as_ref()
            .map(|c| c.to_string())
            .unwrap_or_default();

        tracing::error!(
            error_message = %self.message,
            status_code = self.status.as_u16(),
            underlying_err = %underlying,
            "HTTP handler returned an error"
        );

        self.into_http_response()
    }
}

/// Writes `data` as a `200 OK` JSON body. A `null` value produces an empty body.
pub fn write_json<T: Serialize + ?Sized>(data: &T) -> HandlerResult {
    let body = serde_json::to_vec(data).map_err(HandlerError::internal)?;
    if body == b"null" {
        return Ok(StatusCode::OK.into_response());
    }
    Ok(json_response(StatusCode::OK, body))
}

/// Serializes `body` with `status`, falling back to a static 500 on failure.
pub(crate) fn render_json<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response {
    match serde_json::to_vec(body) {
        Ok(bytes) => json_response(status, bytes),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY).into_response(),
    }
}

fn json_response(status: StatusCode, body: Vec<u8>) -> Response {
    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::Serializer;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    /// Appends JSON log lines to a shared buffer.
    #[derive(Clone)]
    struct BufWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for BufWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_json_logs(f: impl FnOnce()) -> Vec<serde_json::Value> {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let make_writer = {
            let buf = buf.clone();
            move || BufWriter(buf.clone())
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_ansi(false)
            .with_writer(make_writer)
            .finish();
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buf.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn error_response_from_status() {
        let resp = ErrorResponse::from_status(StatusCode::NOT_FOUND);
        assert_eq!(resp.message, "Not Found");
        assert_eq!(resp.code, 404);
    }

    #[tokio::test]
    async fn handler_error_writes_message_and_code_only() {
        let err = HandlerError::new(
            std::io::Error::other("disk on fire"),
            StatusCode::BAD_REQUEST,
            "bad input",
        );
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = body_string(response).await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, serde_json::json!({"message": "bad input", "code": 400}));
        assert!(!body.contains("disk on fire"));
    }

    #[test]
    fn handler_error_logs_message_status_and_cause() {
        let logs = capture_json_logs(|| {
            let err = HandlerError::new(
                std::io::Error::other("db down"),
                StatusCode::BAD_REQUEST,
                "bad input",
            );
            let _ = err.into_response();
        });

        assert_eq!(logs.len(), 1);
        let record = &logs[0];
        assert_eq!(record["level"], "ERROR");

        let fields = &record["fields"];
        assert_eq!(fields["message"], "HTTP handler returned an error");
        assert_eq!(fields["error_message"], "bad input");
        assert_eq!(fields["status_code"], 400);
        assert_eq!(fields["underlying_err"], "db down");
    }

    #[test]
    fn handler_error_keeps_cause_for_operators() {
        let err = HandlerError::internal(std::io::Error::other("db down"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal Server Error");
        assert_eq!(err.cause().unwrap().to_string(), "db down");
        assert!(err.to_string().contains("db down"));
        assert!(StdError::source(&err).is_some());
    }

    #[test]
    fn from_status_has_no_cause() {
        let err = HandlerError::from_status(StatusCode::FORBIDDEN);
        assert!(err.cause().is_none());
        assert_eq!(err.message(), "Forbidden");
    }

    #[tokio::test]
    async fn unserializable_payload_falls_back_to_static_500() {
        let response = render_json(StatusCode::BAD_REQUEST, &Unserializable);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, FALLBACK_BODY);
    }

    #[tokio::test]
    async fn write_json_serializes_data() {
        let response = write_json(&serde_json::json!({"ok": true})).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn write_json_null_has_empty_body() {
        let response = write_json(&Option::<u32>::None).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.is_empty());
    }

    #[test]
    fn write_json_failure_is_internal_error() {
        let err = write_json(&Unserializable).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.cause().is_some());
    }
}
