use crate::category::{display_from_str, CategoryValue};
use crate::dates::{deserialize_optional_date, null_as_default};
use crate::record::{Record, RecordId};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields requested on every task read.
pub const TASK_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "title",
    "description",
    "status",
    "priority",
    "due_date",
    "assigned_to",
    "category",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl CategoryValue for TaskStatus {
    const ALL: &'static [Self] = &[TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];
    const KIND: &'static str = "task status";

    fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl CategoryValue for TaskPriority {
    const ALL: &'static [Self] = &[TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];
    const KIND: &'static str = "task priority";

    fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskCategory {
    #[default]
    Work,
    Personal,
    Learning,
    Other,
}

impl CategoryValue for TaskCategory {
    const ALL: &'static [Self] = &[
        TaskCategory::Work,
        TaskCategory::Personal,
        TaskCategory::Learning,
        TaskCategory::Other,
    ];
    const KIND: &'static str = "task category";

    fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Personal => "Personal",
            TaskCategory::Learning => "Learning",
            TaskCategory::Other => "Other",
        }
    }
}

display_from_str!(TaskStatus, TaskPriority, TaskCategory);

/// Typed view of a task record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Id", default)]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: TaskPriority,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<Value>,
    #[serde(default)]
    pub category: Option<TaskCategory>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<String>,
    #[serde(rename = "CreatedBy", default)]
    pub created_by: Option<Value>,
    #[serde(rename = "ModifiedOn", default)]
    pub modified_on: Option<String>,
}

impl Task {
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(record.clone()))?)
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: TaskStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: TaskPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: TaskCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("task title is required".to_string()));
        }
        Ok(())
    }

    pub fn into_record(self) -> Result<Record> {
        to_record(&self)
    }
}

/// Partial update for a task; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.title, Some(title) if title.trim().is_empty()) {
            return Err(Error::Validation("task title cannot be blank".to_string()));
        }
        Ok(())
    }

    pub fn into_record(self) -> Result<Record> {
        to_record(&self)
    }
}

pub(crate) fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Validation(format!("expected an object, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::record_from_value;
    use serde_json::json;

    #[test]
    fn test_status_serializes_display_strings() {
        assert_eq!(serde_json::to_value(TaskStatus::ToDo).unwrap(), json!("To Do"));
        assert_eq!(serde_json::to_value(TaskStatus::InProgress).unwrap(), json!("In Progress"));
        assert_eq!("in progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert!("Blocked".parse::<TaskStatus>().is_err());
        assert_eq!(format!("{:<8}|", TaskPriority::High), "High    |");
    }

    #[test]
    fn test_draft_validation() {
        assert!(TaskDraft::new("Write report").validate().is_ok());
        assert!(TaskDraft::new("   ").validate().is_err());
    }

    #[test]
    fn test_draft_into_record() {
        let record = TaskDraft::new("Write report")
            .with_priority(TaskPriority::High)
            .into_record()
            .unwrap();

        assert_eq!(record["title"], json!("Write report"));
        assert_eq!(record["status"], json!("To Do"));
        assert_eq!(record["priority"], json!("High"));
        assert_eq!(record["category"], json!("Work"));
        assert!(!record.contains_key("due_date"));
    }

    #[test]
    fn test_patch_sends_only_present_fields() {
        let patch = TaskPatch {
            status: Some(TaskStatus::Done),
            ..TaskPatch::default()
        };
        let record = patch.into_record().unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record["status"], json!("Done"));

        let blank = TaskPatch {
            title: Some(" ".to_string()),
            ..TaskPatch::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_task_from_backend_record() {
        let record = record_from_value(json!({
            "Id": 12,
            "title": "Ship it",
            "status": "Done",
            "priority": "Low",
            "due_date": "2024-05-01T00:00:00Z",
            "CreatedOn": "2024-04-01T08:00:00Z"
        }));

        let task = Task::from_record(&record).unwrap();
        assert_eq!(task.id, Some(RecordId::Int(12)));
        assert!(task.is_done());
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(task.category, None);
    }

    #[test]
    fn test_task_with_null_fields() {
        let record = record_from_value(json!({
            "Id": 1,
            "title": "x",
            "status": null,
            "priority": null,
            "due_date": null,
            "category": null
        }));

        let task = Task::from_record(&record).unwrap();
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.due_date, None);
        assert_eq!(task.category, None);
    }
}
