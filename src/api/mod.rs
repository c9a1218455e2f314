//! REST API module using Axum
//!
//! HTTP surface of the DCRM analysis engine:
//! - capture upload + full pipeline at `POST /api/v1/analyze`
//! - overlay re-bucketing at `POST /api/v1/overlay`
//! - liveness at `GET /api/v1/health`
//!
//! All responses use the envelope convention from [`envelope`].

pub mod envelope;
pub mod handlers;
mod routes;

pub use handlers::ApiState;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// A full-length capture at 10 kHz with six channel groups runs to a
/// few MB of CSV; axum's 2 MB default would reject real uploads.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Build a CORS layer that is restrictive by default (same-origin only).
///
/// Set `DCRM_CORS_ORIGINS` to a comma-separated list of allowed origins
/// for development (e.g., `http://localhost:5173` for a Vite dev server).
fn build_cors_layer() -> CorsLayer {
    match std::env::var("DCRM_CORS_ORIGINS") {
        Ok(origins) => {
            let allowed: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!(origins = %origins, "CORS: allowing configured origins");
            CorsLayer::new()
                .allow_origin(allowed)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
        Err(_) => {
            // No cross-origin allowed — dashboard is same-origin
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([header::CONTENT_TYPE])
        }
    }
}

/// Create the complete application router.
pub fn create_app(state: ApiState) -> Router {
    let cors = build_cors_layer();

    Router::new()
        .nest("/api/v1", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
}
