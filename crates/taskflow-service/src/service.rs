use crate::entity::{Entity, ProjectEntity, TaskEntity};
use crate::statistics::{ProjectStatistics, StatisticsAggregator, TaskStatistics};
use serde_json::Value;
use std::marker::PhantomData;
use taskflow_client::{RecordAdapter, Result};
use taskflow_core::record::CREATED_ON_FIELD;
use taskflow_core::{
    build_query, FilterCriteria, QueryDescriptor, Record, RecordId, RecordPage, SortDirection,
};

/// Parameters of a paged list read.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub filters: FilterCriteria,
    pub search: Option<String>,
    pub page: u64,
    pub limit: u64,
    /// Falls back to the entity's default sort field.
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            filters: FilterCriteria::new(),
            search: None,
            page: 0,
            limit: 10,
            sort_field: None,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn page(mut self, page: u64, limit: u64) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }
}

/// CRUD facade over one backend table.
///
/// Reads go through the query builder; writes forward the caller's record
/// as-is. Errors are logged with the entity and id and propagated unchanged.
pub struct EntityService<E: Entity> {
    adapter: RecordAdapter,
    table: String,
    _entity: PhantomData<E>,
}

pub type TaskService = EntityService<TaskEntity>;
pub type ProjectService = EntityService<ProjectEntity>;

impl<E: Entity> Clone for EntityService<E> {
    fn clone(&self) -> Self {
        Self {
            adapter: self.adapter.clone(),
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> EntityService<E> {
    pub fn new(adapter: RecordAdapter) -> Self {
        Self {
            adapter,
            table: E::DEFAULT_TABLE.to_string(),
            _entity: PhantomData,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Descriptor for a list read: equality filters, optional search,
    /// paging and a single ordering.
    pub fn list_query(&self, request: &ListRequest) -> QueryDescriptor {
        let sort_field = request
            .sort_field
            .as_deref()
            .unwrap_or(E::DEFAULT_SORT_FIELD);

        let query = build_query(
            E::FIELDS,
            &request.filters,
            request.page,
            request.limit,
            sort_field,
            request.sort_direction,
        );

        match &request.search {
            Some(term) => query.with_search(E::SEARCH_FIELD, term),
            None => query,
        }
    }

    pub async fn list(&self, request: &ListRequest) -> Result<RecordPage> {
        let query = self.list_query(request);
        self.adapter
            .fetch(&self.table, &query)
            .await
            .inspect_err(|e| tracing::error!("Error fetching {}s: {}", E::NAME, e))
    }

    /// Most recently created records first.
    pub async fn recent(&self, limit: u64) -> Result<RecordPage> {
        let request = ListRequest::new()
            .page(0, limit)
            .sort(CREATED_ON_FIELD, SortDirection::Desc);
        self.list(&request).await
    }

    pub async fn get_by_id(&self, id: &RecordId) -> Result<Option<Record>> {
        let query = QueryDescriptor::by_id(E::FIELDS, id);
        let page = self
            .adapter
            .fetch(&self.table, &query)
            .await
            .inspect_err(|e| tracing::error!("Error fetching {} {}: {}", E::NAME, id, e))?;

        Ok(page.data.into_iter().next())
    }

    pub async fn create(&self, record: Record) -> Result<Record> {
        let created = self
            .adapter
            .create(&self.table, record)
            .await
            .inspect_err(|e| tracing::error!("Error creating {}: {}", E::NAME, e))?;

        tracing::info!(
            "Created {} {}",
            E::NAME,
            RecordId::from_record(&created)
                .map(|id| id.to_string())
                .unwrap_or_else(|| "(no id)".to_string())
        );

        Ok(created)
    }

    pub async fn update(&self, id: &RecordId, record: Record) -> Result<Record> {
        self.adapter
            .update(&self.table, id, record)
            .await
            .inspect_err(|e| tracing::error!("Error updating {} {}: {}", E::NAME, id, e))
    }

    pub async fn delete(&self, id: &RecordId) -> Result<Option<Record>> {
        let deleted = self
            .adapter
            .delete(&self.table, id)
            .await
            .inspect_err(|e| tracing::error!("Error deleting {} {}: {}", E::NAME, id, e))?;

        tracing::info!("Deleted {} {}", E::NAME, id);
        Ok(deleted)
    }

    fn aggregator(&self) -> StatisticsAggregator {
        StatisticsAggregator::new(self.adapter.clone())
    }
}

impl EntityService<TaskEntity> {
    /// Counts per status and per priority.
    pub async fn statistics(&self) -> Result<TaskStatistics> {
        let aggregator = self.aggregator();
        let (status_counts, priority_counts) = tokio::try_join!(
            aggregator.count_by(&self.table, "status"),
            aggregator.count_by(&self.table, "priority"),
        )
        .inspect_err(|e| tracing::error!("Error fetching task statistics: {}", e))?;

        Ok(TaskStatistics {
            status_counts,
            priority_counts,
        })
    }
}

impl EntityService<ProjectEntity> {
    /// Counts per status.
    pub async fn statistics(&self) -> Result<ProjectStatistics> {
        let status_counts = self
            .aggregator()
            .count_by(&self.table, "status")
            .await
            .inspect_err(|e| tracing::error!("Error fetching project statistics: {}", e))?;

        Ok(ProjectStatistics { status_counts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use taskflow_client::InMemoryRecordClient;
    use taskflow_core::record::record_from_value;
    use taskflow_core::{FilterOperator, TaskStatus};

    fn task_service() -> (TaskService, Arc<InMemoryRecordClient>) {
        let backend = Arc::new(InMemoryRecordClient::new());
        let service = TaskService::new(RecordAdapter::new(backend.clone()));
        (service, backend)
    }

    #[test]
    fn test_list_query_defaults() {
        let (service, _) = task_service();
        let query = service.list_query(&ListRequest::new());

        assert_eq!(query.fields.len(), taskflow_core::TASK_FIELDS.len());
        assert!(query.filters.is_empty());
        assert_eq!(query.order_by[0].field, "due_date");
        assert_eq!(query.order_by[0].direction, SortDirection::Asc);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_list_query_with_search_and_filters() {
        let (service, _) = task_service();
        let request = ListRequest::new()
            .filter("status", "Done")
            .search("report")
            .page(3, 20);
        let query = service.list_query(&request);

        assert_eq!(query.filters.len(), 2);
        assert_eq!(query.filters[0].operator, FilterOperator::Equal);
        assert_eq!(query.filters[1].operator, FilterOperator::Contains);
        assert_eq!(query.filters[1].field, "title");
        assert_eq!(query.offset(), 60);
    }

    #[test]
    fn test_project_defaults() {
        let backend = Arc::new(InMemoryRecordClient::new());
        let service = ProjectService::new(RecordAdapter::new(backend));
        let query = service.list_query(&ListRequest::new().search("site"));

        assert_eq!(service.table(), "project2");
        assert_eq!(query.order_by[0].field, "start_date");
        assert_eq!(query.filters[0].field, "Name");
    }

    #[tokio::test]
    async fn test_list_on_empty_backend() {
        let (service, _) = task_service();
        let request = ListRequest::new()
            .filter("status", "Done")
            .page(0, 10)
            .sort("due_date", SortDirection::Asc);

        let page = service.list(&request).await.unwrap();
        assert_eq!(page, RecordPage { data: vec![], total: 0 });
    }

    #[tokio::test]
    async fn test_get_by_id_returns_none_when_missing() {
        let (service, _) = task_service();
        assert!(service.get_by_id(&RecordId::Int(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (service, _) = task_service();
        let created = service
            .create(record_from_value(json!({
                "title": "Write report",
                "status": "To Do",
                "priority": "Medium"
            })))
            .await
            .unwrap();

        let id = RecordId::from_record(&created).unwrap();
        let fetched = service.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(fetched["title"], json!("Write report"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_propagates() {
        let (service, _) = task_service();
        let result = service
            .update(&RecordId::Int(77), record_from_value(json!({"status": "Done"})))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_task_statistics() {
        let (service, backend) = task_service();
        for (status, priority) in [("Done", "High"), ("To Do", "High"), ("Done", "Low")] {
            service
                .create(record_from_value(json!({"title": "t", "status": status, "priority": priority})))
                .await
                .unwrap();
        }

        let stats = service.statistics().await.unwrap();
        assert_eq!(backend.fetch_calls(), 6);
        assert_eq!(stats.status(TaskStatus::Done), 2);
        assert_eq!(stats.priority(taskflow_core::TaskPriority::High), 2);
        assert_eq!(stats.total(), 3);
    }
}
