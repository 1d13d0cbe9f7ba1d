//! REST endpoints: health, liveness, and the ingestion trigger.

use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use serde::Deserialize;
use tracing::error;

use crate::ingest::IngestService;
use crate::model::EmailFilter;

/// Shared state for the API routes.
#[derive(Clone)]
pub struct AppState {
    pub ingest: Arc<IngestService>,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    limit: Option<usize>,
    page_token: Option<String>,
}

/// GET /health
///
/// Reports the service name and version.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /ping — bare liveness probe.
async fn ping() -> impl IntoResponse {
    StatusCode::OK
}

/// GET /emails/all?limit=N&page_token=T
///
/// Runs one full ingest pass: retrieve promotional mail, index headers,
/// write the snapshot. Any pipeline failure maps to a 500 with the error
/// text; there is no finer-grained status mapping.
async fn get_all_emails(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> impl IntoResponse {
    let filter = EmailFilter {
        max_results: params.limit.filter(|&l| l > 0).unwrap_or(50),
        page_token: params.page_token.unwrap_or_default(),
        only_promotional: true,
        ..Default::default()
    };

    match state.ingest.ingest(&filter).await {
        Ok((emails, s3_filename)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "emails": emails,
                "s3_filename": s3_filename,
                "message": "Emails successfully stored in S3",
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Ingest failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Build the API router.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ping", get(ping))
        .route("/emails/all", get(get_all_emails))
        .with_state(state)
}
