use crate::service::{ProjectService, TaskService};
use crate::statistics::{ProjectStatistics, TaskStatistics};
use serde::Serialize;
use taskflow_client::Result;
use taskflow_core::{Record, TaskStatus};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub task_statistics: TaskStatistics,
    pub project_statistics: ProjectStatistics,
    pub recent_tasks: Vec<Record>,
    pub recent_projects: Vec<Record>,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub total_projects: usize,
}

/// Overview across tasks and projects.
#[derive(Clone)]
pub struct Dashboard {
    tasks: TaskService,
    projects: ProjectService,
}

impl Dashboard {
    pub fn new(tasks: TaskService, projects: ProjectService) -> Self {
        Self { tasks, projects }
    }

    /// Gathers both statistics sets and the most recent records. Any failing
    /// section fails the whole summary.
    pub async fn summary(&self, recent_limit: u64) -> Result<DashboardSummary> {
        let (task_statistics, project_statistics, recent_tasks, recent_projects) = tokio::try_join!(
            self.tasks.statistics(),
            self.projects.statistics(),
            self.tasks.recent(recent_limit),
            self.projects.recent(recent_limit),
        )
        .inspect_err(|e| tracing::error!("Error fetching dashboard data: {}", e))?;

        Ok(DashboardSummary {
            total_tasks: task_statistics.total(),
            completed_tasks: task_statistics.status(TaskStatus::Done),
            in_progress_tasks: task_statistics.status(TaskStatus::InProgress),
            total_projects: project_statistics.total(),
            task_statistics,
            project_statistics,
            recent_tasks: recent_tasks.data,
            recent_projects: recent_projects.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use taskflow_client::{InMemoryRecordClient, RecordAdapter};
    use taskflow_core::record::record_from_value;

    #[tokio::test]
    async fn test_summary_totals_and_recent_order() {
        let adapter = RecordAdapter::new(Arc::new(InMemoryRecordClient::new()));
        let tasks = TaskService::new(adapter.clone());
        let projects = ProjectService::new(adapter);

        for (title, status) in [("first", "Done"), ("second", "In Progress"), ("third", "To Do")] {
            tasks
                .create(record_from_value(json!({"title": title, "status": status, "priority": "Low"})))
                .await
                .unwrap();
        }
        projects
            .create(record_from_value(json!({"Name": "Website", "status": "Completed"})))
            .await
            .unwrap();

        let summary = Dashboard::new(tasks, projects).summary(2).await.unwrap();

        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.completed_tasks, 1);
        assert_eq!(summary.in_progress_tasks, 1);
        assert_eq!(summary.total_projects, 1);
        assert_eq!(summary.recent_tasks.len(), 2);
        assert_eq!(summary.recent_tasks[0]["title"], json!("third"));
        assert_eq!(summary.recent_projects[0]["Name"], json!("Website"));
    }
}
