//! Query descriptors sent with every read against the record backend.
//!
//! A descriptor names the fields to return, a conjunction of predicates,
//! an optional page window and a single ordering. Descriptors are built
//! fresh for each call and never persisted.

use crate::record::{Record, RecordId, ID_FIELD};
use crate::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Loosely-typed filter criteria: field name to required value.
pub type FilterCriteria = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            _ => Err(Error::InvalidSortDirection(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    Equal,
    /// Case-insensitive substring match, used for free-text search.
    Contains,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: Value,
}

impl Filter {
    pub fn equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Equal,
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator: FilterOperator::Contains,
            value: Value::String(term.into()),
        }
    }

    /// Evaluates the predicate against a record. A missing field never matches.
    pub fn matches(&self, record: &Record) -> bool {
        let Some(actual) = record.get(&self.field) else {
            return false;
        };

        match self.operator {
            FilterOperator::Equal => loose_eq(actual, &self.value),
            FilterOperator::Contains => {
                let needle = value_text(&self.value).to_lowercase();
                match actual {
                    Value::Array(items) => items.iter().any(|item| loose_eq(item, &self.value)),
                    other => value_text(other).to_lowercase().contains(&needle),
                }
            }
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            value_text(a) == value_text(b)
        }
        _ => a == b,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging_info: Option<PagingInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
}

impl QueryDescriptor {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().map(|f| f.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_paging(mut self, page: u64, limit: u64) -> Self {
        self.paging_info = Some(PagingInfo {
            limit,
            offset: offset_for(page, limit),
        });
        self
    }

    pub fn with_order(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = vec![OrderBy {
            field: field.into(),
            direction,
        }];
        self
    }

    /// Adds a substring predicate for free-text search. Blank terms are ignored.
    pub fn with_search(self, field: &str, term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            return self;
        }
        self.with_filter(Filter::contains(field, term))
    }

    /// Single-record lookup by `Id`.
    pub fn by_id(fields: &[&str], id: &RecordId) -> Self {
        Self::new(fields).with_filter(Filter::equal(ID_FIELD, id.to_value()))
    }

    /// Minimal read used for counting: only `Id` is returned.
    pub fn count_where(field: &str, value: impl Into<Value>) -> Self {
        Self::new(&[ID_FIELD]).with_filter(Filter::equal(field, value))
    }

    pub fn offset(&self) -> u64 {
        self.paging_info.map(|p| p.offset).unwrap_or(0)
    }
}

/// Zero-based page to row offset.
pub fn offset_for(page: u64, limit: u64) -> u64 {
    page.saturating_mul(limit)
}

/// Turns every criteria entry into exactly one equality predicate.
pub fn build_filters(criteria: &FilterCriteria) -> Vec<Filter> {
    criteria
        .iter()
        .map(|(field, value)| Filter::equal(field.clone(), value.clone()))
        .collect()
}

/// Builds the descriptor for a paged, sorted list read.
pub fn build_query(
    fields: &[&str],
    criteria: &FilterCriteria,
    page: u64,
    limit: u64,
    sort_field: &str,
    sort_direction: SortDirection,
) -> QueryDescriptor {
    let mut query = QueryDescriptor::new(fields)
        .with_paging(page, limit)
        .with_order(sort_field, sort_direction);

    if !criteria.is_empty() {
        query.filters = build_filters(criteria);
    }

    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_value;
    use serde_json::json;

    fn criteria(pairs: &[(&str, Value)]) -> FilterCriteria {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_offset_is_page_times_limit() {
        for page in 0..20u64 {
            for limit in 1..15u64 {
                let query = build_query(&["Id"], &FilterCriteria::new(), page, limit, "Id", SortDirection::Asc);
                let paging = query.paging_info.unwrap();
                assert_eq!(paging.offset, page * limit);
                assert_eq!(paging.limit, limit);
            }
        }
    }

    #[test]
    fn test_each_criterion_becomes_one_equal_predicate() {
        let c = criteria(&[
            ("status", json!("Done")),
            ("priority", json!("High")),
            ("category", json!("Work")),
        ]);

        let query = build_query(&["Id"], &c, 0, 10, "due_date", SortDirection::Asc);

        assert_eq!(query.filters.len(), 3);
        assert!(query.filters.iter().all(|f| f.operator == FilterOperator::Equal));
        assert!(query
            .filters
            .iter()
            .any(|f| f.field == "priority" && f.value == json!("High")));
    }

    #[test]
    fn test_empty_criteria_omits_filters_member() {
        let query = build_query(&["Id"], &FilterCriteria::new(), 0, 10, "due_date", SortDirection::Desc);
        let value = serde_json::to_value(&query).unwrap();

        assert!(value.get("filters").is_none());
        assert_eq!(value["orderBy"], json!([{"field": "due_date", "direction": "desc"}]));
        assert_eq!(value["pagingInfo"], json!({"limit": 10, "offset": 0}));
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!("ASC".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_search_adds_contains_predicate() {
        let query = QueryDescriptor::new(&["Id"]).with_search("title", "  report ");
        assert_eq!(query.filters, vec![Filter::contains("title", "report")]);

        let blank = QueryDescriptor::new(&["Id"]).with_search("title", "   ");
        assert!(blank.filters.is_empty());
    }

    #[test]
    fn test_filter_matching() {
        let record = record_from_value(json!({
            "Id": 4,
            "title": "Write Report",
            "team_members": ["ana", "bo"],
        }));

        assert!(Filter::equal("Id", json!("4")).matches(&record));
        assert!(Filter::contains("title", "report").matches(&record));
        assert!(!Filter::equal("title", json!("report")).matches(&record));
        assert!(Filter::contains("team_members", "bo").matches(&record));
        assert!(!Filter::equal("status", json!("Done")).matches(&record));
    }
}
