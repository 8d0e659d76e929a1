//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! One Axum router serves the websocket endpoint the drawing clients connect
//! to, a plain status document at `/`, and `/healthz` for probes. CORS is
//! limited to `CLIENT_URL` when configured.

pub mod ws;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::state::AppState;

/// Build the full router.
pub fn app(state: AppState, client_url: Option<&str>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/healthz", get(healthz))
        .route("/ws", get(ws::handle_ws))
        .layer(cors_layer(client_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(client_url: Option<&str>) -> CorsLayer {
    let origin = match client_url.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            warn!(error = %e, "CLIENT_URL is not a valid origin; allowing any origin");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
}

async fn status() -> Json<serde_json::Value> {
    Json(json!({"status": "sketchroom server running"}))
}

async fn healthz(State(state): State<AppState>) -> Response {
    match state.dispatch.stats().await {
        Some(stats) => Json(json!({"status": "ok", "rooms": stats.rooms, "connections": stats.connections}))
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "dispatch stopped").into_response(),
    }
}
