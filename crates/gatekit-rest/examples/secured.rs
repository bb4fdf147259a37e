//! Issues tokens for a single bcrypt-hashed user and serves a bearer-protected route.
//!
//! ```text
//! GATEKIT_JWT_SECRET=change-me cargo run -p gatekit-rest --example secured
//! curl -s -XPOST localhost:3000/login -d '{"user":"demo","password":"demo"}' -H 'content-type: application/json'
//! curl -s localhost:3000/me -H "Authorization: Bearer <token>"
//! ```

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use gatekit_auth::{hash_password, unix_now, verify_password, TokenCodec, VerifiedClaims};
use gatekit_rest::{
    build_info, init_logging, version_routes, write_json, HandlerError, HandlerResult, RouterExt,
    SecurityConfig,
};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

const TOKEN_TTL_SECS: i64 = 3600;

struct AppState {
    codec: TokenCodec,
    user: String,
    password_hash: String,
}

#[derive(Deserialize)]
struct Login {
    user: String,
    password: String,
}

async fn login(State(state): State<Arc<AppState>>, Json(login): Json<Login>) -> HandlerResult {
    if login.user != state.user || !verify_password(&state.password_hash, &login.password) {
        return Err(HandlerError::from_status(StatusCode::UNAUTHORIZED));
    }

    let token = state.codec.create(&json!({
        "sub": login.user,
        "exp": unix_now() + TOKEN_TTL_SECS,
    }))?;

    write_json(&json!({ "token": token }))
}

async fn me(VerifiedClaims(claims): VerifiedClaims) -> HandlerResult {
    write_json(&claims)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config: SecurityConfig = SecurityConfig::builder()
        .with_dotenv()
        .with_env_prefix("GATEKIT")
        .build()?;

    init_logging(&config.log);

    let info = build_info!();
    tracing::info!(build = %info.info(), context = %info.build_context(), "starting");

    let codec = config
        .token_codec()
        .ok_or("GATEKIT_JWT_SECRET must be set")?;

    let state = Arc::new(AppState {
        codec,
        user: "demo".to_string(),
        password_hash: hash_password("demo")?,
    });

    let protected = Router::new().route("/me", get(me)).with_security(&config);

    let app = Router::new()
        .route("/login", post(login))
        .with_state(state)
        .merge(protected)
        .merge(version_routes(info));

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
