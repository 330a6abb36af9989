use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Hosted record backend over HTTP.
    Http,
    /// In-process tables; nothing survives a restart.
    Memory,
}

/// Runtime configuration, read from `TASKFLOW_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub backend: BackendKind,
    pub backend_url: String,
    pub canvas_id: String,
    pub api_key: Option<String>,
    pub task_table: String,
    pub project_table: String,
    pub api_port: u16,
    pub local_store_path: PathBuf,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("TASKFLOW"))
    }

    pub fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("backend", "http")?
            .set_default("backend_url", "http://localhost:8080/api")?
            .set_default("canvas_id", "")?
            .set_default("task_table", "task6")?
            .set_default("project_table", "project2")?
            .set_default("api_port", 3000)?
            .set_default("local_store_path", "taskflow-local.json")?
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
