pub mod adapter;
pub mod client;
pub mod memory;
pub mod error;

// Re-exports
pub use adapter::RecordAdapter;
pub use client::{HttpRecordClient, RecordClient};
pub use memory::InMemoryRecordClient;
pub use error::{Error, Result};
