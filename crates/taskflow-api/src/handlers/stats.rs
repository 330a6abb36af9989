use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use taskflow_service::DashboardSummary;

use super::error::{backend_error, ApiError};
use crate::state::ApiState;

const DEFAULT_RECENT: u64 = 5;

#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    pub recent: Option<u64>,
}

pub async fn get_dashboard(
    State(state): State<ApiState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardSummary>, ApiError> {
    state
        .services
        .dashboard
        .summary(query.recent.unwrap_or(DEFAULT_RECENT))
        .await
        .map(Json)
        .map_err(|e| backend_error(e, "Failed to load dashboard data"))
}
