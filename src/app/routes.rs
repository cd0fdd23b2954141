use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::core::forwarder::Forwarder;
use crate::core::{Passthrough, Resource};

// Route paths
pub const NATIONAL_DAILY: &str = "/api/coviddata/national/daily";
pub const SINGLE_DAY: &str = "/api/coviddata/national/daily/{date}";
pub const STATES: &str = "/api/coviddata/states";
pub const STATE_BY_CODE: &str = "/api/coviddata/states/{stateCode}";
pub const HEALTH: &str = "/health";

#[derive(Clone)]
pub struct AppState {
    forwarder: Arc<Forwarder>,
}

impl AppState {
    pub fn new(forwarder: Forwarder) -> Self {
        Self {
            forwarder: Arc::new(forwarder),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app: &'static str,
    version: &'static str,
    upstream: String,
    ts: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        app: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        upstream: state.forwarder.base_url().to_string(),
        ts: chrono::Utc::now().to_rfc3339(),
    })
}

async fn root() -> &'static str {
    "COVID tracker API is running"
}

async fn national_daily(State(state): State<AppState>) -> Response {
    relay(&state, Resource::NationalDaily).await
}

async fn single_day(State(state): State<AppState>, Path(date): Path<String>) -> Response {
    relay(&state, Resource::SingleDay { date }).await
}

async fn states(State(state): State<AppState>) -> Response {
    relay(&state, Resource::States).await
}

async fn state_by_code(
    State(state): State<AppState>,
    Path(state_code): Path<String>,
) -> Response {
    relay(&state, Resource::StateByCode { state_code }).await
}

async fn relay(state: &AppState, resource: Resource) -> Response {
    match state.forwarder.forward(&resource).await {
        Ok(payload) => passthrough_response(payload),
        Err(err) => err.into_response(),
    }
}

fn passthrough_response(payload: Passthrough) -> Response {
    let content_type = payload
        .content_type
        .unwrap_or_else(|| "application/json".to_string());
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        payload.body,
    )
        .into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(HEALTH, get(health))
        .route(NATIONAL_DAILY, get(national_daily))
        .route(SINGLE_DAY, get(single_day))
        .route(STATES, get(states))
        .route(STATE_BY_CODE, get(state_by_code))
        // 前端 dashboard 跨來源呼叫
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
