use crate::config::AppConfig;
use crate::store::{postgres::PgStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let store = Arc::new(PgStore::connect(&config.database).await?) as Arc<dyn Store>;
        Ok(Self::from_parts(store, Arc::new(config)))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    #[cfg(test)]
    pub fn fake(store: crate::store::memory::MemoryStore) -> Self {
        let config = AppConfig::from_lookup(|_| None).expect("default config");
        Self::from_parts(Arc::new(store), Arc::new(config))
    }
}
