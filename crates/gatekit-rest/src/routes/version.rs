use axum::routing::get;
use axum::{Json, Router};
use gatekit::BuildInfo;
use std::sync::Arc;

/// Returns a router with a read-only `GET /version` endpoint.
pub fn version_routes(info: BuildInfo) -> Router {
    let info = Arc::new(info);
    Router::new().route(
        "/version",
        get(move || {
            let info = Arc::clone(&info);
            async move { Json(info.as_ref().clone()) }
        }),
    )
}
