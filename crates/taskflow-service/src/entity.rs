use taskflow_core::{PROJECT_FIELDS, TASK_FIELDS};

/// Static description of a backend table served by an [`EntityService`](crate::EntityService).
pub trait Entity: Send + Sync + 'static {
    /// Singular name used in log messages.
    const NAME: &'static str;
    const DEFAULT_TABLE: &'static str;
    const FIELDS: &'static [&'static str];
    const DEFAULT_SORT_FIELD: &'static str;
    /// Field matched by free-text search.
    const SEARCH_FIELD: &'static str;
}

pub struct TaskEntity;

impl Entity for TaskEntity {
    const NAME: &'static str = "task";
    const DEFAULT_TABLE: &'static str = "task6";
    const FIELDS: &'static [&'static str] = TASK_FIELDS;
    const DEFAULT_SORT_FIELD: &'static str = "due_date";
    const SEARCH_FIELD: &'static str = "title";
}

pub struct ProjectEntity;

impl Entity for ProjectEntity {
    const NAME: &'static str = "project";
    const DEFAULT_TABLE: &'static str = "project2";
    const FIELDS: &'static [&'static str] = PROJECT_FIELDS;
    const DEFAULT_SORT_FIELD: &'static str = "start_date";
    const SEARCH_FIELD: &'static str = "Name";
}
