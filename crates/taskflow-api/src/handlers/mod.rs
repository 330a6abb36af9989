pub mod error;
pub mod health;
pub mod lists;
pub mod params;
pub mod project;
pub mod stats;
pub mod task;
