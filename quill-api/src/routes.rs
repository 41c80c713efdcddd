use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use quill_core::{JobDescriptor, OwnerId, ReportKind};
use quill_store::artifact_key;

use crate::error::ApiError;
use crate::state::ApiState;

/// Build the report pipeline router
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/reports/generate", post(generate))
        .route("/api/reports/status/{job_id}", get(status))
        .route("/api/reports/download/{job_id}", get(download))
        .route("/api/reports/health", get(health))
        .with_state(state)
}

fn owner_from_headers(headers: &HeaderMap) -> Result<OwnerId, ApiError> {
    headers
        .get("x-owner-id")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map(OwnerId::new)
        .ok_or(ApiError::Unauthenticated("Missing x-owner-id header"))
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub report_kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub job_id: String,
    pub status: &'static str,
}

/// Accept a generation request: mint the descriptor, enqueue it, answer
/// immediately. Never waits on the render.
async fn generate(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(request): Json<GenerateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let owner_id = owner_from_headers(&headers)?;

    let report_kind = match request.report_kind.as_deref() {
        Some(raw) => raw
            .parse::<ReportKind>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => ReportKind::default(),
    };

    let descriptor = JobDescriptor::new(owner_id, report_kind).with_context("origin", "api");
    let body = serde_json::to_vec(&descriptor)
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;

    state.queue.enqueue(body).await?;
    info!(job_id = %descriptor.job_id, owner_id = %descriptor.owner_id, "report queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse {
            job_id: descriptor.job_id.to_string(),
            status: "queued",
        }),
    ))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub job_id: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Derive job status from artifact existence. Queued and processing are
/// indistinguishable here; both read as "processing".
async fn status(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let owner_id = owner_from_headers(&headers)?;
    let key = artifact_key(owner_id.as_str(), &job_id);

    let response = if state.store.exists(&key).await? {
        StatusResponse {
            download_url: Some(format!("/api/reports/download/{}", job_id)),
            job_id,
            status: "completed",
        }
    } else {
        StatusResponse {
            job_id,
            status: "processing",
            download_url: None,
        }
    };

    Ok(Json(response))
}

/// Stream the artifact bytes back with their recorded content type
async fn download(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError> {
    let owner_id = owner_from_headers(&headers)?;
    let key = artifact_key(owner_id.as_str(), &job_id);

    let artifact = state.store.get(&key).await?;

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"report-{}.pdf\"", job_id),
        )
        .body(Body::from(artifact.bytes))
        .map_err(|e| ApiError::Internal(anyhow::Error::new(e)))?;

    Ok(response)
}

async fn health(State(state): State<ApiState>) -> Json<serde_json::Value> {
    let queue_ok = state.queue.dead_letter_count().await.is_ok();
    let store_ok = state.store.exists("reports/health/probe.pdf").await.is_ok();

    Json(json!({
        "service": "reports",
        "status": "healthy",
        "queue": queue_ok,
        "store": store_ok,
    }))
}
