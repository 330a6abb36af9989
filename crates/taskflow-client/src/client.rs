use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use taskflow_core::{QueryDescriptor, Record, RecordId, RecordPage};

/// The hosted record backend. Every table-level read and write goes through
/// this seam, so services can run against HTTP or an in-process double.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Read records matching a descriptor
    async fn fetch_records(&self, table: &str, query: &QueryDescriptor) -> Result<RecordPage>;

    /// Create a record, returning it as stored
    async fn create_record(&self, table: &str, record: Record) -> Result<Record>;

    /// Replace the given fields of an existing record
    async fn update_record(&self, table: &str, id: &RecordId, record: Record) -> Result<Record>;

    /// Delete a record; the backend may or may not echo it back
    async fn delete_record(&self, table: &str, id: &RecordId) -> Result<Option<Record>>;
}

/// JSON-over-HTTP client for the record backend.
#[derive(Clone)]
pub struct HttpRecordClient {
    client: Client,
    base_url: String,
    canvas_id: String,
    api_key: Option<String>,
}

impl HttpRecordClient {
    pub fn new(base_url: impl Into<String>, canvas_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            canvas_id: canvas_id.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn records_url(&self, table: &str) -> String {
        format!("{}/tables/{}/records", self.base_url, table)
    }

    fn record_url(&self, table: &str, id: &RecordId) -> String {
        format!("{}/{}", self.records_url(table), id)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("x-canvas-id", &self.canvas_id)
            .header("content-type", "application/json");

        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn read_data(response: Response) -> Result<Option<Record>> {
        let body = Self::check(response).await?.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: DataEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.data)
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    data: Option<Record>,
}

#[async_trait]
impl RecordClient for HttpRecordClient {
    async fn fetch_records(&self, table: &str, query: &QueryDescriptor) -> Result<RecordPage> {
        tracing::debug!("Fetching records from {}", table);

        let response = self
            .authorize(self.client.post(format!("{}/query", self.records_url(table))))
            .json(query)
            .send()
            .await?;

        let page: RecordPage = Self::check(response).await?.json().await?;
        Ok(page)
    }

    async fn create_record(&self, table: &str, record: Record) -> Result<Record> {
        tracing::debug!("Creating record in {}", table);

        let response = self
            .authorize(self.client.post(self.records_url(table)))
            .json(&json!({ "record": record }))
            .send()
            .await?;

        Self::read_data(response).await?.ok_or_else(|| {
            Error::InvalidResponse(format!("create in {} returned no data", table))
        })
    }

    async fn update_record(&self, table: &str, id: &RecordId, record: Record) -> Result<Record> {
        tracing::debug!("Updating record {} in {}", id, table);

        let response = self
            .authorize(self.client.put(self.record_url(table, id)))
            .json(&json!({ "record": record }))
            .send()
            .await?;

        Self::read_data(response).await?.ok_or_else(|| {
            Error::InvalidResponse(format!("update of {} in {} returned no data", id, table))
        })
    }

    async fn delete_record(&self, table: &str, id: &RecordId) -> Result<Option<Record>> {
        tracing::debug!("Deleting record {} from {}", id, table);

        let response = self
            .authorize(self.client.delete(self.record_url(table, id)))
            .send()
            .await?;

        Self::read_data(response).await
    }
}
