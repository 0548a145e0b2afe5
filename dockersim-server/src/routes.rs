//! HTTP route handlers for the demo API.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, warn};

use dockersim::{
    CategoryNotFound, LogCategory, LogEntry, LogType, Scenario, ScenarioExecutionError,
    ScenarioReport, SystemState,
};

use crate::sse;
use crate::state::AppState;

/// Build the full router (API, health, live events) with state attached.
pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .route("/health", get(health))
        .route("/events", get(sse::events_handler))
        .with_state(state)
}

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(status))
        .route("/test/{scenario}", post(run_test))
        .route("/logs/{category}", get(get_logs))
        .route("/reset", post(reset))
}

/// Errors surfaced to API clients.
#[derive(Debug)]
pub enum ApiError {
    CategoryNotFound(CategoryNotFound),
    ScenarioNotFound(String),
    Scenario(ScenarioExecutionError),
    /// The task running a scenario panicked or was cancelled.
    RunTask(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::CategoryNotFound(err) => {
                debug!(error = %err, "log lookup rejected");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": "Category not found" })),
                )
                    .into_response()
            }
            ApiError::ScenarioNotFound(name) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "error": format!("Unknown scenario: {name}") })),
            )
                .into_response(),
            ApiError::Scenario(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": err.message })),
            )
                .into_response(),
            ApiError::RunTask(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": message })),
            )
                .into_response(),
        }
    }
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime: f64,
}

/// GET /health - liveness check.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: now_rfc3339(),
        uptime: state.uptime_secs(),
    })
}

#[derive(Serialize)]
struct StatusResponse {
    status: &'static str,
    uptime: f64,
    timestamp: String,
    system: SystemState,
    environment: EnvironmentInfo,
}

#[derive(Serialize)]
struct EnvironmentInfo {
    name: String,
    version: &'static str,
    platform: &'static str,
    arch: &'static str,
}

/// GET /api/status - counters, every log category, and build info.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running",
        uptime: state.uptime_secs(),
        timestamp: now_rfc3339(),
        system: state.harness.current(),
        environment: EnvironmentInfo {
            name: state.environment.clone(),
            version: env!("CARGO_PKG_VERSION"),
            platform: std::env::consts::OS,
            arch: std::env::consts::ARCH,
        },
    })
}

/// POST /api/test/:scenario - run one scripted scenario to completion.
async fn run_test(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ScenarioReport>, ApiError> {
    let scenario: Scenario = name
        .parse()
        .map_err(|_| ApiError::ScenarioNotFound(name.clone()))?;
    info!(scenario = %scenario, "scenario requested");
    // Spawned so a client disconnect cannot stop a run partway through.
    let harness = state.harness.clone();
    let report = tokio::spawn(async move { harness.run(scenario).await })
        .await
        .map_err(|err| {
            error!(scenario = %scenario, error = %err, "scenario task failed");
            ApiError::RunTask(format!("Scenario task failed: {err}"))
        })?
        .map_err(|err| {
            warn!(scenario = %scenario, error = %err, "scenario failed");
            ApiError::Scenario(err)
        })?;
    Ok(Json(report))
}

/// GET /api/logs/:category - retained entries, oldest first.
async fn get_logs(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    state
        .harness
        .logs(&category)
        .map(Json)
        .map_err(ApiError::CategoryNotFound)
}

#[derive(Serialize)]
struct ResetResponse {
    success: bool,
    message: &'static str,
}

/// POST /api/reset - install the baseline state.
async fn reset(State(state): State<AppState>) -> Json<ResetResponse> {
    state.harness.reset();
    state
        .harness
        .log(LogCategory::Orchestration, "System reset completed", LogType::Info);
    Json(ResetResponse {
        success: true,
        message: "System reset",
    })
}
