use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use taskflow_local::{ChecklistItem, ItemDraft, ItemFilter, ItemStats, ItemUpdate, TaskList};

use super::error::{local_error, ApiError};
use crate::state::ApiState;

#[derive(Debug, Serialize)]
pub struct ListsResponse {
    pub lists: Vec<TaskList>,
    pub active: TaskList,
}

#[derive(Debug, Deserialize)]
pub struct CreateListRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub list_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemsQuery {
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<ChecklistItem>,
    pub filter: ItemFilter,
    pub stats: ItemStats,
}

pub async fn get_lists(State(state): State<ApiState>) -> Result<Json<ListsResponse>, ApiError> {
    let lists = state.local.lists().await.map_err(local_error)?;
    let active = state.local.active_list().await.map_err(local_error)?;

    Ok(Json(ListsResponse { lists, active }))
}

pub async fn create_list(
    State(state): State<ApiState>,
    Json(payload): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<TaskList>), ApiError> {
    let list = state.local.add_list(&payload.name).await.map_err(local_error)?;
    Ok((StatusCode::CREATED, Json(list)))
}

pub async fn delete_list(
    State(state): State<ApiState>,
    Path(list_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.local.delete_list(&list_id).await.map_err(local_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_active_list(
    State(state): State<ApiState>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<Json<TaskList>, ApiError> {
    state.local.set_active(&payload.list_id).await.map_err(local_error)?;
    state.local.active_list().await.map(Json).map_err(local_error)
}

pub async fn list_items(
    State(state): State<ApiState>,
    Path(list_id): Path<String>,
    Query(query): Query<ItemsQuery>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse::<ItemFilter>().map_err(local_error)?,
        None => ItemFilter::All,
    };

    let items = state.local.items(&list_id, filter).await.map_err(local_error)?;
    let stats = state.local.stats(&list_id).await.map_err(local_error)?;

    Ok(Json(ItemsResponse {
        items,
        filter,
        stats,
    }))
}

pub async fn create_item(
    State(state): State<ApiState>,
    Path(list_id): Path<String>,
    Json(draft): Json<ItemDraft>,
) -> Result<(StatusCode, Json<ChecklistItem>), ApiError> {
    let item = state
        .local
        .add_item(&list_id, draft)
        .await
        .map_err(local_error)?;

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<ApiState>,
    Path((list_id, item_id)): Path<(String, String)>,
    Json(update): Json<ItemUpdate>,
) -> Result<Json<ChecklistItem>, ApiError> {
    state
        .local
        .update_item(&list_id, &item_id, update)
        .await
        .map(Json)
        .map_err(local_error)
}

pub async fn toggle_item(
    State(state): State<ApiState>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<Json<ChecklistItem>, ApiError> {
    state
        .local
        .toggle_item(&list_id, &item_id)
        .await
        .map(Json)
        .map_err(local_error)
}

pub async fn delete_item(
    State(state): State<ApiState>,
    Path((list_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .local
        .delete_item(&list_id, &item_id)
        .await
        .map_err(local_error)?;

    Ok(StatusCode::NO_CONTENT)
}
