//! HTTP surface
//!
//! `GET /` health check and `POST /api/generate_plan`. Request bodies are
//! validated into a `PlanRequest` before any model call is made.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use plancore::{PlanRequest, PlanResponse, RequestError};

use crate::config::Config;
use crate::llm::create_client;
use crate::planner::{PlanError, PlanService};
use crate::prompts::PromptLoader;

pub const SERVICE_NAME: &str = "smart-task-planner";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<PlanService>,
}

/// Errors surfaced to HTTP clients as `{"detail": ...}`
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("LLM error: {0}")]
    Planner(#[from] PlanError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Planner(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::InvalidInput(detail) => warn!(%detail, "rejected request"),
            ApiError::Planner(e) => error!(error = %e, "plan generation failed"),
        }
        (status, Json(json!({"detail": self.to_string()}))).into_response()
    }
}

/// Body of `POST /api/generate_plan`
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub goal: String,
    #[serde(default)]
    pub team_size: Option<i64>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl GenerateRequest {
    /// Validate into the request the pipeline consumes
    pub fn into_plan_request(self) -> std::result::Result<PlanRequest, RequestError> {
        PlanRequest::new(self.goal, self.team_size, self.mode)
    }
}

/// Build the application router
pub fn router(state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let origins = allowed_origins
        .iter()
        .map(|o| HeaderValue::from_str(o).context(format!("Invalid CORS origin: {}", o)))
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Ok(Router::new()
        .route("/", get(health))
        .route("/api/generate_plan", post(generate_plan))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok", "service": SERVICE_NAME}))
}

async fn generate_plan(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
    let Json(body) = body?;
    let request = body.into_plan_request()?;
    let plan = state.planner.generate(&request).await?;
    Ok(Json(plan))
}

/// Build the service from config and serve until Ctrl-C
pub async fn serve(config: &Config, bind: &str) -> Result<()> {
    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let prompts = PromptLoader::new(config.prompts.dir.as_deref());
    let planner = Arc::new(PlanService::new(llm, prompts, config.llm.max_tokens));
    let app = router(AppState { planner }, &config.server.allowed_origins)?;

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .context(format!("Failed to bind {}", bind))?;
    info!(%bind, provider = %config.llm.provider, model = %config.llm.model, "serve: listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("serve: shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "shutdown_signal: failed to listen for Ctrl-C");
    }
}
