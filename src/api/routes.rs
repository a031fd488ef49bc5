//! Router, handlers and server startup.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use tower_http::trace::TraceLayer;

use super::page::PageRenderer;
use super::types::{ErrorResponse, HealthResponse, PlanForm, PlanRequest, PlanResponse};
use crate::config::Config;
use crate::planner::{PlanOutcome, PlanningSession};

/// Shared, read-only state for all handlers.
pub struct AppState {
    pub config: Config,
    pub session: PlanningSession,
    pub pages: PageRenderer,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/api/plan", post(plan))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the planning session and serve until the process is stopped.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let session = PlanningSession::from_config(&config)?;
    let pages = PageRenderer::new().map_err(|e| anyhow::anyhow!("page template: {}", e))?;
    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState {
        config,
        session,
        pages,
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, router(state)).await?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Form page
// ─────────────────────────────────────────────────────────────────────────────

fn page(state: &AppState, city: &str, outcome: Option<&PlanOutcome>) -> Response {
    match state.pages.render(city, outcome) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to render page").into_response()
        }
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Response {
    page(&state, "", None)
}

async fn submit(State(state): State<Arc<AppState>>, Form(form): Form<PlanForm>) -> Response {
    let city = form.city.trim();
    if city.is_empty() {
        return page(&state, "", None);
    }

    let (outcome, _) = state.session.plan_with_trace(city).await;
    page(&state, city, Some(&outcome))
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON API
// ─────────────────────────────────────────────────────────────────────────────

async fn plan(State(state): State<Arc<AppState>>, Json(req): Json<PlanRequest>) -> Response {
    let city = req.city.trim();
    if city.is_empty() {
        let body = ErrorResponse {
            error: "city must not be empty".to_string(),
        };
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    let (outcome, events) = state.session.plan_with_trace(city).await;
    Json(PlanResponse {
        status: outcome.kind(),
        message: outcome.message(),
        events,
    })
    .into_response()
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.config.model.clone(),
    })
}
