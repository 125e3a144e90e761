use axum::{extract::{State, Path, Query}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::{auth::AuthUser, json::ApiJson};
use crate::api::dtos::requests::InventoryQuery;
use crate::domain::models::{
    assignment::{CheckinDraft, CheckoutDraft},
    inventory::ItemDraft,
};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_items(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
    Query(query): Query<InventoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.inventory_service.list_items(&query.filters()?).await?;
    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ApiJson(payload): ApiJson<ItemDraft>,
) -> Result<impl IntoResponse, AppError> {
    let item = state.inventory_service.create_item(&user, payload).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn check_out(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(item_id): Path<String>,
    ApiJson(payload): ApiJson<CheckoutDraft>,
) -> Result<impl IntoResponse, AppError> {
    let assignment = state.inventory_service.check_out(&user, &item_id, payload).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(item_id): Path<String>,
    payload: Option<ApiJson<CheckinDraft>>,
) -> Result<impl IntoResponse, AppError> {
    let draft = payload.map(|ApiJson(draft)| draft).unwrap_or_default();
    let assignment = state.inventory_service.check_in(&user, &item_id, draft).await?;
    Ok(Json(assignment))
}
