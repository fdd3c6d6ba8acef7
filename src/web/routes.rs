//! HTTP routes for the dashboard
//!
//! Provides API endpoints for layout, sessions and chart data, plus
//! static file serving for the embedded frontend.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
};
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::{PayloadRange, SiteFilter};
use crate::binder::{BINDINGS, ChartUpdate, ControlEvent, Selection, render_chart};
use crate::session::SessionId;
use crate::view::DashboardLayout;

use super::server::AppState;

/// Embedded static assets
#[derive(RustEmbed)]
#[folder = "web-assets/"]
struct Assets;

/// Response to a new session
#[derive(Serialize)]
struct SessionResponse {
    session_id: SessionId,
    selection: Selection,
    updates: Vec<ChartUpdate>,
}

/// Charts recomputed after a control event
#[derive(Serialize)]
struct UpdatesResponse {
    updates: Vec<ChartUpdate>,
}

/// Query parameters for stateless chart rendering
#[derive(Deserialize)]
struct ChartsQuery {
    site: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
}

/// Create API routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/layout", get(get_layout))
        .route("/api/charts", get(get_charts))
        .route("/api/session", post(create_session))
        .route("/api/session/{id}", delete(close_session))
        .route("/api/session/{id}/event", post(session_event))
}

/// Create static file routes
pub fn static_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index_html))
        .route("/{*path}", get(static_handler))
}

fn session_not_found(id: SessionId) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": format!("Session {} not found", id)})),
    )
        .into_response()
}

/// GET /api/health - Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

/// GET /api/layout - Returns the static dashboard layout
async fn get_layout(State(state): State<Arc<AppState>>) -> Json<DashboardLayout> {
    Json(state.layout.clone())
}

/// GET /api/charts - Renders both charts for an explicit selection
async fn get_charts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ChartsQuery>,
) -> Json<UpdatesResponse> {
    let defaults = state.layout.default_payload();
    let selection = Selection {
        site: query
            .site
            .as_deref()
            .map(SiteFilter::parse)
            .unwrap_or_default(),
        payload: PayloadRange::new(
            query.min.unwrap_or(defaults.min),
            query.max.unwrap_or(defaults.max),
        ),
    };

    let updates = BINDINGS
        .iter()
        .map(|(chart, _)| render_chart(&state.dataset, &selection, *chart))
        .collect();

    Json(UpdatesResponse { updates })
}

/// POST /api/session - Starts a session and renders its initial charts
async fn create_session(State(state): State<Arc<AppState>>) -> Json<SessionResponse> {
    let (session_id, session) = state.sessions.create(&state.layout);

    Json(SessionResponse {
        session_id,
        selection: session.selection().clone(),
        updates: session.render_all(&state.dataset),
    })
}

/// POST /api/session/{id}/event - Applies a control change
async fn session_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<SessionId>,
    Json(event): Json<ControlEvent>,
) -> Response {
    debug!(session = id, ?event, "control event");

    match state
        .sessions
        .with_session(id, |session| session.handle(&state.dataset, event))
    {
        Some(updates) => Json(UpdatesResponse { updates }).into_response(),
        None => session_not_found(id),
    }
}

/// DELETE /api/session/{id} - Ends a session
async fn close_session(State(state): State<Arc<AppState>>, Path(id): Path<SessionId>) -> Response {
    if state.sessions.remove(id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        session_not_found(id)
    }
}

/// GET / - Serve index.html
async fn index_html() -> impl IntoResponse {
    match Assets::get("index.html") {
        Some(content) => Html(content.data.into_owned()).into_response(),
        None => (StatusCode::NOT_FOUND, "index.html not found").into_response(),
    }
}

/// Static file handler for embedded assets
async fn static_handler(Path(path): Path<String>) -> Response {
    let path = path.trim_start_matches('/');

    match Assets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, format!("File not found: {}", path)).into_response(),
    }
}
