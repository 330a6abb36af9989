use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::collections::HashMap;
use taskflow_core::{ProjectDraft, ProjectPatch, Record};
use taskflow_service::ProjectStatistics;

use super::error::{backend_error, not_found, validation_error, ApiError};
use super::params::{list_request, record_id, ListResponse};
use crate::state::ApiState;

pub async fn list_projects(
    State(state): State<ApiState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, ApiError> {
    let request = list_request(&params)?;

    let page = state
        .services
        .projects
        .list(&request)
        .await
        .map_err(|e| backend_error(e, "Failed to load projects"))?;

    Ok(Json(ListResponse::new(page, &request)))
}

pub async fn get_project(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Record>, ApiError> {
    match state.services.projects.get_by_id(&record_id(&id)).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(not_found("Project not found")),
        Err(e) => Err(backend_error(e, "Failed to load project")),
    }
}

pub async fn create_project(
    State(state): State<ApiState>,
    Json(draft): Json<ProjectDraft>,
) -> Result<(StatusCode, Json<Record>), ApiError> {
    draft.validate().map_err(validation_error)?;
    let record = draft.into_record().map_err(validation_error)?;

    let created = state
        .services
        .projects
        .create(record)
        .await
        .map_err(|e| backend_error(e, "Failed to save project"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_project(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(patch): Json<ProjectPatch>,
) -> Result<Json<Record>, ApiError> {
    patch.validate().map_err(validation_error)?;
    let record = patch.into_record().map_err(validation_error)?;

    let updated = state
        .services
        .projects
        .update(&record_id(&id), record)
        .await
        .map_err(|e| backend_error(e, "Failed to save project"))?;

    Ok(Json(updated))
}

pub async fn delete_project(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .services
        .projects
        .delete(&record_id(&id))
        .await
        .map_err(|e| backend_error(e, "Failed to delete project"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn project_statistics(
    State(state): State<ApiState>,
) -> Result<Json<ProjectStatistics>, ApiError> {
    state
        .services
        .projects
        .statistics()
        .await
        .map(Json)
        .map_err(|e| backend_error(e, "Failed to load project statistics"))
}
