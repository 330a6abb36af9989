use crate::dashboard::Dashboard;
use crate::service::{ProjectService, TaskService};
use crate::settings::{BackendKind, Settings};
use std::sync::Arc;
use taskflow_client::{HttpRecordClient, InMemoryRecordClient, RecordAdapter, RecordClient};

/// The services a surface needs, all sharing one backend client handle.
#[derive(Clone)]
pub struct ServiceContext {
    pub tasks: TaskService,
    pub projects: ProjectService,
    pub dashboard: Dashboard,
}

impl ServiceContext {
    pub fn new(client: Arc<dyn RecordClient>, settings: &Settings) -> Self {
        let adapter = RecordAdapter::new(client);
        let tasks = TaskService::new(adapter.clone()).with_table(&settings.task_table);
        let projects = ProjectService::new(adapter).with_table(&settings.project_table);
        let dashboard = Dashboard::new(tasks.clone(), projects.clone());

        Self {
            tasks,
            projects,
            dashboard,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let client: Arc<dyn RecordClient> = match settings.backend {
            BackendKind::Http => {
                if settings.canvas_id.is_empty() {
                    tracing::warn!("TASKFLOW_CANVAS_ID is not set; backend calls may be rejected");
                }
                tracing::info!("Using record backend at {}", settings.backend_url);
                Arc::new(
                    HttpRecordClient::new(&settings.backend_url, &settings.canvas_id)
                        .with_api_key(settings.api_key.clone()),
                )
            }
            BackendKind::Memory => {
                tracing::warn!("Using in-memory record backend, records will not be persisted");
                Arc::new(InMemoryRecordClient::new())
            }
        };

        Self::new(client, settings)
    }
}
