pub mod models;
pub mod store;
pub mod error;

// Re-exports
pub use models::{
    ChecklistItem, ItemDraft, ItemFilter, ItemPriority, ItemStats, ItemUpdate, TaskList,
    DEFAULT_LIST_ID,
};
pub use store::LocalStore;
pub use error::{Error, Result};
