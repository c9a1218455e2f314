//! API route handlers
//!
//! Request handling logic for the analysis endpoints:
//! - Liveness/version for monitoring
//! - Multipart capture upload running the full analysis pipeline
//! - Overlay re-bucketing for stored abnormal ranges

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::ai::AiClient;
use crate::config::EngineConfig;
use crate::pipeline::{run_analysis, AnalysisOptions};
use crate::processing::synthesize_overlay;
use crate::types::AbnormalRange;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers.
///
/// Everything here is resolved once at startup; requests only read it.
#[derive(Clone)]
pub struct ApiState {
    /// Analysis tunables from `[analysis]` config
    pub options: AnalysisOptions,
    /// Diagnostic-service client (cheap to clone, connection-pooled)
    pub ai_client: AiClient,
    /// Whether the AI stage runs when a request doesn't say either way
    pub ai_default: bool,
    /// Startup instant, for the uptime figure in `/health`
    pub started_at: std::time::Instant,
}

impl ApiState {
    /// Build the handler state from a loaded engine config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            options: AnalysisOptions::from_config(config),
            ai_client: AiClient::new(&config.ai),
            ai_default: config.ai.enabled,
            started_at: std::time::Instant::now(),
        }
    }
}

// ============================================================================
// Request / response types
// ============================================================================

/// Liveness payload for `GET /api/v1/health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    pub ai_enabled: bool,
}

/// Query parameters for `POST /api/v1/analyze`.
#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    /// Overrides the configured AI default for this request
    pub ai: Option<bool>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/health — liveness and version.
pub async fn health(State(state): State<ApiState>) -> Response {
    ApiResponse::ok(HealthStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        ai_enabled: state.ai_default,
    })
}

/// POST /api/v1/analyze — run the full pipeline on an uploaded capture.
///
/// Multipart parts: `test_file` (required CSV), `reference_file`
/// (optional CSV), `ai` (`true`/`false`, overriding the `?ai=` query
/// parameter and the configured default, in that order).
pub async fn analyze(
    State(state): State<ApiState>,
    Query(params): Query<AnalyzeParams>,
    mut multipart: Multipart,
) -> Response {
    let mut test_csv: Option<String> = None;
    let mut reference_csv: Option<String> = None;
    let mut ai_part: Option<bool> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                let value = match field.text().await {
                    Ok(v) => v,
                    Err(e) => {
                        return ApiErrorResponse::bad_request(format!(
                            "unreadable `{name}` part: {e}"
                        ))
                    }
                };
                match name.as_str() {
                    "test_file" => test_csv = Some(value),
                    "reference_file" => reference_csv = Some(value),
                    "ai" => ai_part = Some(value.trim().eq_ignore_ascii_case("true")),
                    other => warn!(part = other, "Ignoring unknown multipart part"),
                }
            }
            Ok(None) => break,
            Err(e) => {
                return ApiErrorResponse::bad_request(format!("malformed multipart body: {e}"))
            }
        }
    }

    let Some(test_csv) = test_csv else {
        return ApiErrorResponse::bad_request("missing required `test_file` part");
    };

    let use_ai = ai_part.or(params.ai).unwrap_or(state.ai_default);
    let ai_client = if use_ai { Some(&state.ai_client) } else { None };

    match run_analysis(&test_csv, reference_csv.as_deref(), &state.options, ai_client).await {
        Ok(document) => ApiResponse::ok(document),
        Err(e) => ApiErrorResponse::unusable_capture(e.to_string()),
    }
}

/// POST /api/v1/overlay — re-bucket a stored list of abnormal ranges.
///
/// Lets the dashboard rebuild chart overlays from persisted diagnostic
/// output without re-running an analysis.
pub async fn overlay(payload: Result<Json<Vec<AbnormalRange>>, JsonRejection>) -> Response {
    match payload {
        Ok(Json(ranges)) => ApiResponse::ok(synthesize_overlay(&ranges)),
        Err(rejection) => ApiErrorResponse::bad_request(rejection.body_text()),
    }
}
