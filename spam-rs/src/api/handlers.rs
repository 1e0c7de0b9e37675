//! API request handlers

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{error, warn};

use crate::batch::BatchSummary;
use crate::error::SpamError;
use crate::service::AnalysisService;

/// Header carrying the caller's user id
pub const USER_HEADER: &str = "x-user-id";

/// User id used when the header is absent
pub const DEFAULT_USER: &str = "demo";

/// Shared application state
pub struct AppState {
    pub service: AnalysisService,
}

/// Caller identity taken from the `X-User-Id` header
#[derive(Debug, Clone)]
pub struct UserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for UserId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(USER_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .unwrap_or(DEFAULT_USER);

        Ok(UserId(user.to_string()))
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

/// Map a service error to a status code and JSON body
pub fn error_response(err: SpamError) -> Response {
    let status = match &err {
        SpamError::UnsupportedFile(_) => StatusCode::BAD_REQUEST,
        SpamError::InvalidInput(_) | SpamError::Csv(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SpamError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", err);
    } else {
        warn!("Request rejected: {}", err);
    }

    (status, Json(ApiError::new(&err.to_string()))).into_response()
}

/// Prediction request body: one message or a list
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub message: Option<String>,
    pub messages: Option<Vec<String>>,
}

/// Single scan request body
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub message: String,
}

/// Bulk upload request body
#[derive(Debug, Deserialize)]
pub struct BulkAnalyzeRequest {
    pub file_name: String,
    pub content: String,
}

/// Bulk upload response
#[derive(Debug, Serialize)]
pub struct BulkAnalyzeResponse {
    pub message: String,
    pub batch_id: String,
    pub summary: BatchSummary,
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /api/predict - Score messages without storing them
pub async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRequest>,
) -> impl IntoResponse {
    let messages = match (req.message, req.messages) {
        (Some(message), _) => vec![message],
        (None, Some(messages)) if !messages.is_empty() => messages,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new("No messages provided or invalid format")),
            )
                .into_response()
        }
    };

    match state.service.predict(messages).await {
        Ok(set) => (StatusCode::OK, Json(set)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/scan - Score and store a single message
pub async fn scan(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Json(req): Json<ScanRequest>,
) -> impl IntoResponse {
    match state.service.analyze(&user, &req.message).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/bulk-analyze - Score an uploaded CSV or text file
pub async fn bulk_analyze(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Json(req): Json<BulkAnalyzeRequest>,
) -> impl IntoResponse {
    match state
        .service
        .analyze_upload(&user, &req.file_name, &req.content)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(BulkAnalyzeResponse {
                message: "Bulk analysis completed successfully".to_string(),
                batch_id: report.id,
                summary: report.summary,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/history - Recent scans, newest first
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
) -> impl IntoResponse {
    match state.service.recent_scans(&user).await {
        Ok(scans) => (StatusCode::OK, Json(scans)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/history/:id
pub async fn get_scan(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_scan(&user, &id).await {
        Ok(scan) => (StatusCode::OK, Json(scan)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/history/:id/download - Scan as CSV
pub async fn download_scan(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.export_scan(&user, &id).await {
        Ok(csv) => csv_response(&format!("scan_report_{}.csv", short_id(&id)), csv),
        Err(e) => error_response(e),
    }
}

/// GET /api/stats - Scan counters of the caller
pub async fn user_stats(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
) -> impl IntoResponse {
    match state.service.user_stats(&user).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/word-stats - Lexicon terms ranked by weight
pub async fn word_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.service.word_stats()))
}

/// DELETE /api/history - Drop all scans and reports of the caller
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
) -> impl IntoResponse {
    match state.service.clear_history(&user).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/reports - Recent batch reports, newest first
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
) -> impl IntoResponse {
    match state.service.recent_reports(&user).await {
        Ok(reports) => (StatusCode::OK, Json(reports)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/reports/:id
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.get_report(&user, &id).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/reports/:id/download - Report as CSV
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.service.export_report(&user, &id).await {
        Ok(csv) => csv_response(&format!("spam_analysis_report_{}.csv", id), csv),
        Err(e) => error_response(e),
    }
}

fn csv_response(file_name: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((cut, _)) => &id[..cut],
        None => id,
    }
}
