use crate::category::{display_from_str, CategoryValue};
use crate::dates::{deserialize_optional_date, null_as_default};
use crate::record::{Record, RecordId};
use crate::task::to_record;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fields requested on every project read.
pub const PROJECT_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "description",
    "status",
    "start_date",
    "end_date",
    "team_members",
    "CreatedOn",
    "CreatedBy",
    "ModifiedOn",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl CategoryValue for ProjectStatus {
    const ALL: &'static [Self] = &[
        ProjectStatus::NotStarted,
        ProjectStatus::InProgress,
        ProjectStatus::Completed,
    ];
    const KIND: &'static str = "project status";

    fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
        }
    }
}

display_from_str!(ProjectStatus);

/// Typed view of a project record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "Id", default)]
    pub id: Option<RecordId>,
    #[serde(rename = "Name", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ProjectStatus,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub team_members: Option<Vec<Value>>,
    #[serde(rename = "CreatedOn", default)]
    pub created_on: Option<String>,
    #[serde(rename = "CreatedBy", default)]
    pub created_by: Option<Value>,
    #[serde(rename = "ModifiedOn", default)]
    pub modified_on: Option<String>,
}

impl Project {
    pub fn from_record(record: &Record) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(record.clone()))?)
    }

    pub fn member_count(&self) -> usize {
        self.team_members.as_ref().map(Vec::len).unwrap_or(0)
    }
}

fn check_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(Error::Validation(format!(
                "project start date {} is after end date {}",
                start, end
            )));
        }
    }
    Ok(())
}

/// Input for creating a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectDraft {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_members: Vec<String>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("project name is required".to_string()));
        }
        check_date_range(self.start_date, self.end_date)
    }

    pub fn into_record(self) -> Result<Record> {
        to_record(&self)
    }
}

/// Partial update for a project; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<String>>,
}

impl ProjectPatch {
    /// Only checks the dates carried by the patch itself; the stored record
    /// may still hold the other end of the range.
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(Error::Validation("project name cannot be blank".to_string()));
        }
        check_date_range(self.start_date, self.end_date)
    }

    pub fn into_record(self) -> Result<Record> {
        to_record(&self)
    }
}
