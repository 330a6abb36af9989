//! In-process record backend.
//!
//! Evaluates query descriptors the way the hosted backend does (predicates,
//! single-field ordering, paging, field projection) against tables held in
//! memory. Used for offline runs and as the test double behind services.

use crate::client::RecordClient;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering as AtomicOrdering};
use taskflow_core::query::{FilterOperator, QueryDescriptor, SortDirection};
use taskflow_core::record::{CREATED_BY_FIELD, CREATED_ON_FIELD, ID_FIELD, MODIFIED_ON_FIELD};
use taskflow_core::{Record, RecordId, RecordPage};
use tokio::sync::RwLock;

pub struct InMemoryRecordClient {
    tables: RwLock<HashMap<String, Vec<Record>>>,
    next_id: AtomicI64,
    fetch_calls: AtomicUsize,
    failing_values: RwLock<Vec<(String, Value)>>,
    owner: String,
}

impl InMemoryRecordClient {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            fetch_calls: AtomicUsize::new(0),
            failing_values: RwLock::new(Vec::new()),
            owner: "local".to_string(),
        }
    }

    /// Number of `fetch_records` calls served so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(AtomicOrdering::SeqCst)
    }

    /// Makes any fetch carrying an equality predicate `field == value` fail
    /// with a 503, to exercise error propagation.
    pub async fn fail_fetches_where(&self, field: &str, value: impl Into<Value>) {
        let mut failing = self.failing_values.write().await;
        failing.push((field.to_string(), value.into()));
    }

    /// Total records held in a table.
    pub async fn len(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map(Vec::len).unwrap_or(0)
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn not_found(table: &str, id: &RecordId) -> Error {
        Error::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        }
    }

    async fn should_fail(&self, query: &QueryDescriptor) -> bool {
        let failing = self.failing_values.read().await;
        query.filters.iter().any(|filter| {
            filter.operator == FilterOperator::Equal
                && failing
                    .iter()
                    .any(|(field, value)| &filter.field == field && &filter.value == value)
        })
    }
}

impl Default for InMemoryRecordClient {
    fn default() -> Self {
        Self::new()
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Null), Some(Value::Null)) => Ordering::Equal,
        (Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), Some(Value::Null)) => Ordering::Greater,
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

fn project_fields(record: &Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record.clone();
    }

    fields
        .iter()
        .filter_map(|field| record.get(field).map(|v| (field.clone(), v.clone())))
        .collect()
}

#[async_trait]
impl RecordClient for InMemoryRecordClient {
    async fn fetch_records(&self, table: &str, query: &QueryDescriptor) -> Result<RecordPage> {
        self.fetch_calls.fetch_add(1, AtomicOrdering::SeqCst);

        if self.should_fail(query).await {
            return Err(Error::Api {
                status: 503,
                message: format!("{} is unavailable", table),
            });
        }

        let tables = self.tables.read().await;
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or(&[]);

        let mut matched: Vec<&Record> = rows
            .iter()
            .filter(|record| query.filters.iter().all(|f| f.matches(record)))
            .collect();

        if let Some(order) = query.order_by.first() {
            matched.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.field), b.get(&order.field))
                    .then_with(|| compare_values(a.get(ID_FIELD), b.get(ID_FIELD)));
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let total = matched.len() as u64;
        let (offset, limit) = match query.paging_info {
            Some(paging) => (paging.offset as usize, paging.limit as usize),
            None => (0, matched.len()),
        };

        let data = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|record| project_fields(record, &query.fields))
            .collect();

        Ok(RecordPage { data, total })
    }

    async fn create_record(&self, table: &str, mut record: Record) -> Result<Record> {
        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let now = Self::now();

        record.insert(ID_FIELD.to_string(), Value::from(id));
        record.insert(CREATED_ON_FIELD.to_string(), Value::from(now.clone()));
        record.insert(CREATED_BY_FIELD.to_string(), Value::from(self.owner.clone()));
        record.insert(MODIFIED_ON_FIELD.to_string(), Value::from(now));

        let mut tables = self.tables.write().await;
        tables
            .entry(table.to_string())
            .or_default()
            .push(record.clone());

        Ok(record)
    }

    async fn update_record(&self, table: &str, id: &RecordId, record: Record) -> Result<Record> {
        let mut tables = self.tables.write().await;
        let existing = tables
            .get_mut(table)
            .and_then(|rows| {
                rows.iter_mut()
                    .find(|row| row.get(ID_FIELD).is_some_and(|v| id.matches(v)))
            })
            .ok_or_else(|| Self::not_found(table, id))?;

        for (field, value) in record {
            if field == ID_FIELD || field == CREATED_ON_FIELD || field == CREATED_BY_FIELD {
                continue;
            }
            existing.insert(field, value);
        }
        existing.insert(MODIFIED_ON_FIELD.to_string(), Value::from(Self::now()));

        Ok(existing.clone())
    }

    async fn delete_record(&self, table: &str, id: &RecordId) -> Result<Option<Record>> {
        let mut tables = self.tables.write().await;
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| Self::not_found(table, id))?;

        let position = rows
            .iter()
            .position(|row| row.get(ID_FIELD).is_some_and(|v| id.matches(v)))
            .ok_or_else(|| Self::not_found(table, id))?;

        Ok(Some(rows.remove(position)))
    }
}
