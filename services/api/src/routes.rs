use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use buildsite::content::{content_router, ContentService, ContentStore};
use buildsite::submissions::{submission_router, SubmissionLimiter, SubmissionService, SubmissionStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_site_routes<C, S, L>(
    content: Arc<ContentService<C>>,
    submissions: Arc<SubmissionService<S, L>>,
    expose_error_details: bool,
) -> axum::Router
where
    C: ContentStore + 'static,
    S: SubmissionStore + 'static,
    L: SubmissionLimiter + 'static,
{
    content_router(content)
        .merge(submission_router(submissions, expose_error_details))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
