use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::domain::models::{auth::UserProfile, user::UserDraft};
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(admin): AuthUser,
    ApiJson(payload): ApiJson<UserDraft>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.user_service.create_user(&admin, payload).await?;
    Ok((StatusCode::CREATED, Json(UserProfile::from(created))))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_service.list_users(&user).await?;
    let profiles: Vec<UserProfile> = users.into_iter().map(UserProfile::from).collect();
    Ok(Json(profiles))
}
