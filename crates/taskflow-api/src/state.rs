use std::sync::Arc;
use taskflow_local::LocalStore;
use taskflow_service::{ServiceContext, Settings};

#[derive(Clone)]
pub struct ApiState {
    pub services: ServiceContext,
    pub local: Arc<LocalStore>,
}

impl ApiState {
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let services = ServiceContext::from_settings(settings);
        let local = Arc::new(LocalStore::open(&settings.local_store_path).await?);

        Ok(Self { services, local })
    }
}
