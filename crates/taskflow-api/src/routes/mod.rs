use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers, state::ApiState};

pub fn create_router(state: ApiState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health::health_check))

        // Task endpoints
        .route(
            "/tasks",
            get(handlers::task::list_tasks).post(handlers::task::create_task),
        )
        .route("/tasks/statistics", get(handlers::task::task_statistics))
        .route(
            "/tasks/:id",
            get(handlers::task::get_task)
                .put(handlers::task::update_task)
                .delete(handlers::task::delete_task),
        )

        // Project endpoints
        .route(
            "/projects",
            get(handlers::project::list_projects).post(handlers::project::create_project),
        )
        .route("/projects/statistics", get(handlers::project::project_statistics))
        .route(
            "/projects/:id",
            get(handlers::project::get_project)
                .put(handlers::project::update_project)
                .delete(handlers::project::delete_project),
        )

        // Dashboard
        .route("/dashboard", get(handlers::stats::get_dashboard))

        // Local checklists
        .route(
            "/lists",
            get(handlers::lists::get_lists).post(handlers::lists::create_list),
        )
        .route("/lists/active", put(handlers::lists::set_active_list))
        .route("/lists/:list_id", delete(handlers::lists::delete_list))
        .route(
            "/lists/:list_id/items",
            get(handlers::lists::list_items).post(handlers::lists::create_item),
        )
        .route(
            "/lists/:list_id/items/:item_id",
            put(handlers::lists::update_item).delete(handlers::lists::delete_item),
        )
        .route(
            "/lists/:list_id/items/:item_id/toggle",
            post(handlers::lists::toggle_item),
        )

        // Add state
        .with_state(state)

        // Add tracing and CORS
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use taskflow_client::InMemoryRecordClient;
    use taskflow_local::LocalStore;
    use taskflow_service::{BackendKind, ServiceContext, Settings};
    use tower::ServiceExt;

    async fn test_app() -> (Router, Arc<InMemoryRecordClient>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            backend: BackendKind::Memory,
            backend_url: String::new(),
            canvas_id: String::new(),
            api_key: None,
            task_table: "task6".to_string(),
            project_table: "project2".to_string(),
            api_port: 0,
            local_store_path: dir.path().join("local.json"),
        };

        let backend = Arc::new(InMemoryRecordClient::new());
        let state = ApiState {
            services: ServiceContext::new(backend.clone(), &settings),
            local: Arc::new(LocalStore::open(&settings.local_store_path).await.unwrap()),
        };

        (create_router(state), backend, dir)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, value)
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _, _dir) = test_app().await;
        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_task_crud_flow() {
        let (app, _, _dir) = test_app().await;

        let (status, body) = send(&app, Method::POST, "/tasks", Some(json!({"title": "  "}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, created) = send(
            &app,
            Method::POST,
            "/tasks",
            Some(json!({"title": "Ship release", "priority": "High"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["Id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/tasks/{}", id),
            Some(json!({"status": "Done"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, fetched) = send(&app, Method::GET, &format!("/tasks/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["status"], "Done");

        let (_, listed) = send(&app, Method::GET, "/tasks?status=Done&limit=5", None).await;
        assert_eq!(listed["total"], 1);
        assert_eq!(listed["pagination"]["limit"], 5);

        let (status, _) = send(&app, Method::DELETE, &format!("/tasks/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, Method::GET, &format!("/tasks/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
    }

    #[tokio::test]
    async fn test_zero_limit_is_bad_request() {
        let (app, _backend, _dir) = test_app().await;
        send(&app, Method::POST, "/tasks", Some(json!({"title": "Write report"}))).await;

        let (status, body) = send(&app, Method::GET, "/tasks?limit=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid limit: 0");

        let (status, body) = send(&app, Method::GET, "/tasks?limit=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["last_item"], 1);
    }

    #[tokio::test]
    async fn test_backend_failure_is_generic() {
        let (app, backend, _dir) = test_app().await;
        backend.fail_fetches_where("status", "Done").await;

        let (status, body) = send(&app, Method::GET, "/tasks?status=Done", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "Failed to load tasks");

        let (status, _) = send(&app, Method::GET, "/dashboard", None).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_dashboard_on_empty_backend() {
        let (app, _, _dir) = test_app().await;
        let (status, body) = send(&app, Method::GET, "/dashboard", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_tasks"], 0);
        assert_eq!(body["recent_projects"], json!([]));
    }

    #[tokio::test]
    async fn test_local_lists_flow() {
        let (app, _, _dir) = test_app().await;

        let (status, body) = send(&app, Method::DELETE, "/lists/default", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "You must have at least one list");

        let (status, list) = send(&app, Method::POST, "/lists", Some(json!({"name": "Errands"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let list_id = list["id"].as_str().unwrap().to_string();

        let (_, item) = send(
            &app,
            Method::POST,
            &format!("/lists/{}/items", list_id),
            Some(json!({"title": "Post office"})),
        )
        .await;
        let item_id = item["id"].as_str().unwrap().to_string();

        let (status, toggled) = send(
            &app,
            Method::POST,
            &format!("/lists/{}/items/{}/toggle", list_id, item_id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(toggled["completed"], true);

        let (_, items) = send(
            &app,
            Method::GET,
            &format!("/lists/{}/items?filter=active", list_id),
            None,
        )
        .await;
        assert_eq!(items["items"], json!([]));
        assert_eq!(items["stats"]["completed"], 1);

        let (_, lists) = send(&app, Method::GET, "/lists", None).await;
        assert_eq!(lists["active"]["id"], list_id.as_str());
    }
}
