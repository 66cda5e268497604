//! Store and service wiring.

use std::sync::Arc;

use retail_infra::{BillService, BillStore, InMemoryBillStore};

use crate::config::ApiConfig;

/// Shared application services handed to every handler.
pub struct AppServices {
    pub bills: BillService<Arc<dyn BillStore>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        Self {
            bills: BillService::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBillStore::new()))
    }
}

pub async fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    if config.use_persistent_stores {
        #[cfg(feature = "postgres")]
        {
            return build_persistent_services(config).await;
        }
        #[cfg(not(feature = "postgres"))]
        {
            tracing::warn!(
                "USE_PERSISTENT_STORES=true but postgres feature not enabled, falling back to in-memory"
            );
            return Ok(AppServices::in_memory());
        }
    }

    tracing::info!("using in-memory bill store");
    Ok(AppServices::in_memory())
}

#[cfg(feature = "postgres")]
async fn build_persistent_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    use anyhow::Context;
    use retail_infra::PostgresBillStore;
    use sqlx::PgPool;

    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("failed to connect to Postgres")?;

    let store = PostgresBillStore::new(pool);
    store.ensure_schema().await.context("failed to prepare bills schema")?;

    tracing::info!("using postgres bill store");
    Ok(AppServices::new(Arc::new(store)))
}
