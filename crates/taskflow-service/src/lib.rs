pub mod context;
pub mod dashboard;
pub mod entity;
pub mod service;
pub mod settings;
pub mod statistics;

// Re-exports
pub use context::ServiceContext;
pub use dashboard::{Dashboard, DashboardSummary};
pub use entity::{Entity, ProjectEntity, TaskEntity};
pub use service::{EntityService, ListRequest, ProjectService, TaskService};
pub use settings::{BackendKind, Settings};
pub use statistics::{CategoryCounts, ProjectStatistics, StatisticsAggregator, TaskStatistics};
