use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use taskflow_core::{Record, TaskDraft, TaskPatch};
use taskflow_service::TaskStatistics;

use super::error::{backend_error, not_found, validation_error, ApiError};
use super::params::{list_request, record_id, ListResponse};
use crate::state::ApiState;

/// List tasks with paging, ordering, search and equality filters
pub async fn list_tasks(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, ApiError> {
    let request = list_request(&params)?;

    let page = state
        .services
        .tasks
        .list(&request)
        .await
        .map_err(|e| backend_error(e, "Failed to load tasks"))?;

    Ok(Json(ListResponse::new(page, &request)))
}

pub async fn get_task(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    match state.services.tasks.get_by_id(&record_id(&id)).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(not_found("Task not found")),
        Err(e) => Err(backend_error(e, "Failed to load task")),
    }
}

pub async fn create_task(
    State(state): State<ApiState>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    draft.validate().map_err(validation_error)?;
    let record = draft.into_record().map_err(validation_error)?;

    let created = state
        .services
        .tasks
        .create(record)
        .await
        .map_err(|e| backend_error(e, "Failed to save task"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_task(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> Result<Json<Record>, ApiError> {
    patch.validate().map_err(validation_error)?;
    let record = patch.into_record().map_err(validation_error)?;

    let updated = state
        .services
        .tasks
        .update(&record_id(&id), record)
        .await
        .map_err(|e| backend_error(e, "Failed to save task"))?;

    Ok(Json(updated))
}

pub async fn delete_task(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .tasks
        .delete(&record_id(&id))
        .await
        .map_err(|e| backend_error(e, "Failed to delete task"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn task_statistics(
    State(state): State<ApiState>,
) -> Result<Json<TaskStatistics>, ApiError> {
    state
        .services
        .tasks
        .statistics()
        .await
        .map(Json)
        .map_err(|e| backend_error(e, "Failed to load task statistics"))
}
