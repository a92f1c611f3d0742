use crate::infra::{resolve_now, resolve_threshold, AppState};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use ormawa::config::ReviewConfig;
use ormawa::elections::{ElectionEvent, ElectionStatus, StatusTransition, TallyResult};
use ormawa::error::AppError;
use ormawa::publications::{DuplicateDetector, DuplicateReport, ReviewQueue, SubmissionRecord};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionScanRequest {
    pub(crate) submissions: Vec<SubmissionRecord>,
    #[serde(default)]
    pub(crate) threshold: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ElectionStatusRequest {
    pub(crate) event: ElectionEvent,
    #[serde(default)]
    pub(crate) now: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ElectionStatusResponse {
    pub(crate) status: ElectionStatus,
    pub(crate) now: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) next_transition: Option<StatusTransition>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ElectionTallyRequest {
    pub(crate) event: ElectionEvent,
    #[serde(default)]
    pub(crate) registered_voter_count: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ElectionTallyResponse {
    #[serde(flatten)]
    pub(crate) tally: TallyResult,
    pub(crate) leaders: Vec<String>,
}

impl From<TallyResult> for ElectionTallyResponse {
    fn from(tally: TallyResult) -> Self {
        let leaders = tally
            .leaders()
            .into_iter()
            .map(|candidate| candidate.name.clone())
            .collect();
        Self { tally, leaders }
    }
}

/// Computation endpoints. Callers layer in `Extension<ReviewConfig>`.
pub(crate) fn portal_router() -> Router {
    Router::new()
        .route(
            "/api/v1/publications/duplicates",
            post(duplicate_scan_endpoint),
        )
        .route("/api/v1/publications/review", post(review_queue_endpoint))
        .route("/api/v1/elections/status", post(election_status_endpoint))
        .route("/api/v1/elections/tally", post(election_tally_endpoint))
}

pub(crate) fn with_operational_routes(router: Router) -> Router {
    router
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
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

pub(crate) async fn duplicate_scan_endpoint(
    Extension(review): Extension<ReviewConfig>,
    Json(payload): Json<SubmissionScanRequest>,
) -> Result<Json<DuplicateReport>, AppError> {
    let threshold = resolve_threshold(payload.threshold, review.duplicate_threshold)?;
    let report = DuplicateDetector::new(threshold).report(&payload.submissions);
    Ok(Json(report))
}

pub(crate) async fn review_queue_endpoint(
    Extension(review): Extension<ReviewConfig>,
    Json(payload): Json<SubmissionScanRequest>,
) -> Result<Json<ReviewQueue>, AppError> {
    let threshold = resolve_threshold(payload.threshold, review.duplicate_threshold)?;
    let queue = ReviewQueue::build(&payload.submissions, &DuplicateDetector::new(threshold));
    debug!(
        pending = queue.counts.pending,
        flagged = queue.flagged_pending().count(),
        "review queue built"
    );
    Ok(Json(queue))
}

pub(crate) async fn election_status_endpoint(
    Json(payload): Json<ElectionStatusRequest>,
) -> Result<Json<ElectionStatusResponse>, AppError> {
    let now = resolve_now(payload.now.as_deref())?;
    Ok(Json(ElectionStatusResponse {
        status: payload.event.status(now),
        now,
        next_transition: payload.event.next_transition(now),
    }))
}

pub(crate) async fn election_tally_endpoint(
    Json(payload): Json<ElectionTallyRequest>,
) -> Json<ElectionTallyResponse> {
    let tally = match payload.registered_voter_count {
        Some(count) => payload.event.tally_with_registered(count),
        None => payload.event.tally(),
    };
    Json(tally.into())
}
