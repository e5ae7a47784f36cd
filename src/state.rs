use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::config::{AppConfig, DemoUserConfig, StoreBackend};
use crate::store::{memory::MemoryStore, postgres::PgStore, HealthStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HealthStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match config.store {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL is required for the postgres store")?;
                let pg = PgStore::connect(url, config.max_connections).await?;
                if let Err(e) = pg.migrate().await {
                    warn!(error = %format!("{e:#}"), "migration failed; continuing");
                }
                Arc::new(pg) as Arc<dyn HealthStore>
            }
            StoreBackend::Memory => {
                info!("using in-memory store; data is lost on restart");
                Arc::new(MemoryStore::new()) as Arc<dyn HealthStore>
            }
        };

        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn HealthStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// Memory-backed state for tests.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            store: StoreBackend::Memory,
            database_url: None,
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 0,
            demo_user: DemoUserConfig::default(),
        });
        Self::from_parts(Arc::new(MemoryStore::new()), config)
    }
}
