use crate::Error;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LIST_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TaskList {
    pub fn default_list() -> Self {
        Self {
            id: DEFAULT_LIST_ID.to_string(),
            name: "My Tasks".to_string(),
            description: "Default task list".to_string(),
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl ItemPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemPriority::Low => "low",
            ItemPriority::Medium => "medium",
            ItemPriority::High => "high",
        }
    }
}

impl FromStr for ItemPriority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(ItemPriority::Low),
            "medium" => Ok(ItemPriority::Medium),
            "high" => Ok(ItemPriority::High),
            _ => Err(Error::Validation(format!("unknown priority: {}", s))),
        }
    }
}

/// One entry of a local checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: ItemPriority,
    pub list_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: ItemPriority,
}

impl ItemDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `Some(None)` clears the due date; an explicit JSON `null` maps to it.
    #[serde(default, deserialize_with = "present_or_null")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default)]
    pub priority: Option<ItemPriority>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl ItemFilter {
    pub fn matches(&self, item: &ChecklistItem) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Active => !item.completed,
            ItemFilter::Completed => item.completed,
        }
    }
}

impl fmt::Display for ItemFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemFilter::All => write!(f, "all"),
            ItemFilter::Active => write!(f, "active"),
            ItemFilter::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for ItemFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(ItemFilter::All),
            "active" => Ok(ItemFilter::Active),
            "completed" | "done" => Ok(ItemFilter::Completed),
            _ => Err(Error::InvalidFilter(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
}

impl ItemStats {
    pub fn from_items(items: &[ChecklistItem]) -> Self {
        let completed = items.iter().filter(|item| item.completed).count();
        Self {
            total: items.len(),
            completed,
            active: items.len() - completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_update_due_date_states() {
        let missing: ItemUpdate = serde_json::from_value(json!({"title": "x"})).unwrap();
        assert_eq!(missing.due_date, None);

        let cleared: ItemUpdate = serde_json::from_value(json!({"dueDate": null})).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: ItemUpdate = serde_json::from_value(json!({"dueDate": "2024-06-01"})).unwrap();
        assert_eq!(set.due_date, Some(NaiveDate::from_ymd_opt(2024, 6, 1)));
    }
}
