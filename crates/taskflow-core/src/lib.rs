pub mod category;
pub mod dates;
pub mod error;
pub mod pagination;
pub mod project;
pub mod query;
pub mod record;
pub mod task;

// Re-exports
pub use category::CategoryValue;
pub use error::{Error, Result};
pub use pagination::PageWindow;
pub use project::{Project, ProjectDraft, ProjectPatch, ProjectStatus, PROJECT_FIELDS};
pub use query::{
    build_filters, build_query, Filter, FilterCriteria, FilterOperator, OrderBy, PagingInfo,
    QueryDescriptor, SortDirection,
};
pub use record::{Record, RecordId, RecordPage};
pub use task::{Task, TaskCategory, TaskDraft, TaskPatch, TaskPriority, TaskStatus, TASK_FIELDS};
