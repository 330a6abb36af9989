use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use taskflow_core::{PageWindow, Record, RecordId, RecordPage, SortDirection};
use taskflow_service::ListRequest;

use super::error::{bad_request, ApiError};

/// Query keys with a fixed meaning; every other key is an equality filter.
const RESERVED: &[&str] = &["page", "limit", "sort_field", "sort_direction", "search"];

pub fn list_request(params: &HashMap<String, String>) -> Result<ListRequest, ApiError> {
    let mut request = ListRequest::new();

    if let Some(page) = params.get("page") {
        request.page = page
            .parse()
            .map_err(|_| bad_request(format!("Invalid page: {}", page)))?;
    }
    if let Some(limit) = params.get("limit") {
        request.limit = limit
            .parse()
            .ok()
            .filter(|limit: &u64| *limit > 0)
            .ok_or_else(|| bad_request(format!("Invalid limit: {}", limit)))?;
    }
    if let Some(field) = params.get("sort_field").filter(|f| !f.is_empty()) {
        request.sort_field = Some(field.clone());
    }
    if let Some(direction) = params.get("sort_direction") {
        request.sort_direction = direction
            .parse::<SortDirection>()
            .map_err(|e| bad_request(e.to_string()))?;
    }
    if let Some(term) = params.get("search") {
        request = request.search(term.clone());
    }

    for (key, value) in params {
        if !RESERVED.contains(&key.as_str()) {
            request.filters.insert(key.clone(), Value::String(value.clone()));
        }
    }

    Ok(request)
}

pub fn record_id(raw: &str) -> RecordId {
    raw.parse().unwrap_or_else(|never: Infallible| match never {})
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<Record>,
    pub total: u64,
    pub pagination: PageWindow,
}

impl ListResponse {
    pub fn new(page: RecordPage, request: &ListRequest) -> Self {
        Self {
            pagination: PageWindow::new(request.page, request.limit, page.total),
            data: page.data,
            total: page.total,
        }
    }
}
