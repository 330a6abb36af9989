use futures_util::future::try_join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use taskflow_client::{Error, RecordAdapter, Result};
use taskflow_core::{CategoryValue, ProjectStatus, QueryDescriptor, TaskPriority, TaskStatus};

/// Count of records per category value.
pub type CategoryCounts<C> = BTreeMap<C, usize>;

/// Counts records per category value with one filtered read per value.
///
/// The reads are independent and run concurrently. The first failure aborts
/// the whole aggregation; counts already gathered are dropped.
#[derive(Clone)]
pub struct StatisticsAggregator {
    adapter: RecordAdapter,
}

impl StatisticsAggregator {
    pub fn new(adapter: RecordAdapter) -> Self {
        Self { adapter }
    }

    pub async fn count_by<C: CategoryValue>(&self, table: &str, field: &str) -> Result<CategoryCounts<C>> {
        let lookups = C::ALL.iter().copied().map(|value| {
            let query = QueryDescriptor::count_where(field, value.as_str());
            async move {
                let page = self.adapter.fetch(table, &query).await?;
                Ok::<_, Error>((value, page.data.len()))
            }
        });

        let counts = try_join_all(lookups).await?;
        tracing::debug!("Counted {} {} values in {}", counts.len(), field, table);

        Ok(counts.into_iter().collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub status_counts: CategoryCounts<TaskStatus>,
    pub priority_counts: CategoryCounts<TaskPriority>,
}

impl TaskStatistics {
    pub fn total(&self) -> usize {
        self.status_counts.values().sum()
    }

    pub fn status(&self, status: TaskStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }

    pub fn priority(&self, priority: TaskPriority) -> usize {
        self.priority_counts.get(&priority).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatistics {
    pub status_counts: CategoryCounts<ProjectStatus>,
}

impl ProjectStatistics {
    pub fn total(&self) -> usize {
        self.status_counts.values().sum()
    }

    pub fn status(&self, status: ProjectStatus) -> usize {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}
