use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use serde_json::{Map, Value};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::{
    requests::ListJobsQuery,
    responses::{JobWriteResponse, MessageResponse},
};
use crate::domain::models::{job::JobDraft, media::MediaDraft, page::PageRequest};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_jobs(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Query(query): Query<ListJobsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let filters = query.filters()?;
    let page = PageRequest::new(
        query.page(),
        query.per_page(),
        state.config.default_per_page,
        state.config.max_per_page,
    );
    let jobs = state.job_service.list_jobs(&user, &filters, page).await?;
    Ok(Json(jobs))
}

pub async fn get_job(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let job = state.job_service.get_job(&user, &job_id).await?;
    Ok(Json(job))
}

pub async fn create_job(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<JobDraft>,
) -> Result<impl IntoResponse, AppError> {
    let job = state.job_service.create_job(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(JobWriteResponse { message: "Job created successfully", job })))
}

pub async fn update_job(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
    ApiJson(payload): ApiJson<Map<String, Value>>,
) -> Result<impl IntoResponse, AppError> {
    let job = state.job_service.update_job(&user, &job_id, &payload).await?;
    Ok(Json(JobWriteResponse { message: "Job updated successfully", job }))
}

pub async fn delete_job(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.job_service.delete_job(&user, &job_id).await?;
    Ok(Json(MessageResponse { message: "Job deleted successfully" }))
}

pub async fn list_job_assignments(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let assignments = state.job_service.list_job_assignments(&user, &job_id).await?;
    Ok(Json(assignments))
}

pub async fn attach_media(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(job_id): Path<String>,
    ApiJson(payload): ApiJson<MediaDraft>,
) -> Result<impl IntoResponse, AppError> {
    let media = state.job_service.attach_media(&user, &job_id, payload).await?;
    Ok((StatusCode::CREATED, Json(media)))
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let stats = state.job_service.dashboard_stats(&user).await?;
    Ok(Json(stats))
}
