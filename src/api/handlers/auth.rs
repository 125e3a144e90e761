use axum::{response::IntoResponse, Json};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::UserProfile;

pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    Json(UserProfile::from(user))
}
