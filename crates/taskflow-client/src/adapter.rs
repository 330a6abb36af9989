use crate::client::RecordClient;
use crate::Result;
use std::sync::Arc;
use taskflow_core::{QueryDescriptor, Record, RecordId, RecordPage};

/// Table-addressed access to the record backend.
///
/// Holds one injected client handle shared by every caller. Failures are
/// logged with the operation, table and id, then returned unchanged: nothing
/// is retried and nothing is translated.
#[derive(Clone)]
pub struct RecordAdapter {
    client: Arc<dyn RecordClient>,
}

impl RecordAdapter {
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<dyn RecordClient> {
        &self.client
    }

    pub async fn fetch(&self, table: &str, query: &QueryDescriptor) -> Result<RecordPage> {
        self.client
            .fetch_records(table, query)
            .await
            .inspect_err(|e| tracing::error!("Error fetching records from {}: {}", table, e))
    }

    pub async fn create(&self, table: &str, record: Record) -> Result<Record> {
        self.client
            .create_record(table, record)
            .await
            .inspect_err(|e| tracing::error!("Error creating record in {}: {}", table, e))
    }

    pub async fn update(&self, table: &str, id: &RecordId, record: Record) -> Result<Record> {
        self.client
            .update_record(table, id, record)
            .await
            .inspect_err(|e| tracing::error!("Error updating record {} in {}: {}", id, table, e))
    }

    pub async fn delete(&self, table: &str, id: &RecordId) -> Result<Option<Record>> {
        self.client
            .delete_record(table, id)
            .await
            .inspect_err(|e| tracing::error!("Error deleting record {} from {}: {}", id, table, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryRecordClient;
    use crate::Error;
    use serde_json::json;
    use taskflow_core::record::record_from_value;

    #[tokio::test]
    async fn test_adapter_forwards_to_client() {
        let backend = Arc::new(InMemoryRecordClient::new());
        let adapter = RecordAdapter::new(backend.clone());

        let created = adapter
            .create("tasks", record_from_value(json!({"title": "x"})))
            .await
            .unwrap();
        let id = RecordId::from_record(&created).unwrap();

        let page = adapter
            .fetch("tasks", &QueryDescriptor::by_id(&["Id", "title"], &id))
            .await
            .unwrap();
        assert_eq!(page.data[0]["title"], json!("x"));
        assert_eq!(backend.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn test_adapter_returns_error_unchanged() {
        let adapter = RecordAdapter::new(Arc::new(InMemoryRecordClient::new()));

        let err = adapter
            .delete("tasks", &RecordId::Int(5))
            .await
            .unwrap_err();

        match err {
            Error::NotFound { table, id } => {
                assert_eq!(table, "tasks");
                assert_eq!(id, "5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_two_creates_make_two_records() {
        let backend = Arc::new(InMemoryRecordClient::new());
        let adapter = RecordAdapter::new(backend.clone());
        let record = record_from_value(json!({"title": "same"}));

        adapter.create("tasks", record.clone()).await.unwrap();
        adapter.create("tasks", record).await.unwrap();

        assert_eq!(backend.len("tasks").await, 2);
    }
}
