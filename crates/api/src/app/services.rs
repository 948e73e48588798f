//! Storage wiring for the HTTP layer.
//!
//! Services are built once at startup and shared through an axum
//! `Extension`. Handlers never reach a global repository.

use std::sync::Arc;

use sqlx::PgPool;

use wms_infra::catalog_store::{CatalogStore, InMemoryCatalogStore, PostgresCatalogStore};
use wms_infra::config::StorageConfig;
use wms_infra::db;
use wms_infra::inventory_store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore};
use wms_infra::{AdjustmentCoordinator, AdjustmentError, StoreError};
use wms_inventory::{AdjustmentRequest, InventoryKey, InventoryRecord};

type InMemoryCoordinator = AdjustmentCoordinator<Arc<InMemoryInventoryStore>>;

type PersistentCoordinator = AdjustmentCoordinator<Arc<PostgresInventoryStore>>;

#[derive(Clone)]
pub enum AppServices {
    InMemory {
        coordinator: Arc<InMemoryCoordinator>,
        catalog: Arc<dyn CatalogStore>,
    },
    Persistent {
        coordinator: Arc<PersistentCoordinator>,
        catalog: Arc<dyn CatalogStore>,
    },
}

impl AppServices {
    /// Process-local stores (dev/test).
    pub fn in_memory() -> Self {
        AppServices::InMemory {
            coordinator: Arc::new(AdjustmentCoordinator::new(Arc::new(
                InMemoryInventoryStore::new(),
            ))),
            catalog: Arc::new(InMemoryCatalogStore::new()),
        }
    }

    /// Postgres-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        AppServices::Persistent {
            coordinator: Arc::new(AdjustmentCoordinator::new(Arc::new(
                PostgresInventoryStore::new(pool.clone()),
            ))),
            catalog: Arc::new(PostgresCatalogStore::new(pool)),
        }
    }

    pub async fn from_config(storage: &StorageConfig) -> Result<Self, StoreError> {
        match storage {
            StorageConfig::InMemory => {
                tracing::info!("using in-memory stores");
                Ok(Self::in_memory())
            }
            StorageConfig::Postgres(database) => {
                let pool = db::connect(database).await?;
                if database.run_migrations {
                    db::migrate(&pool).await?;
                }
                tracing::info!("using postgres stores");
                Ok(Self::postgres(pool))
            }
        }
    }

    pub fn catalog(&self) -> &dyn CatalogStore {
        match self {
            AppServices::InMemory { catalog, .. } | AppServices::Persistent { catalog, .. } => {
                catalog.as_ref()
            }
        }
    }

    pub async fn adjust(&self, request: &AdjustmentRequest) -> Result<(), AdjustmentError> {
        match self {
            AppServices::InMemory { coordinator, .. } => coordinator.adjust(request).await,
            AppServices::Persistent { coordinator, .. } => coordinator.adjust(request).await,
        }
    }

    pub async fn get_inventory(
        &self,
        key: InventoryKey,
    ) -> Result<Option<InventoryRecord>, StoreError> {
        match self {
            AppServices::InMemory { coordinator, .. } => coordinator.store().get(key).await,
            AppServices::Persistent { coordinator, .. } => coordinator.store().get(key).await,
        }
    }

    pub async fn insert_inventory(&self, record: &InventoryRecord) -> Result<(), StoreError> {
        match self {
            AppServices::InMemory { coordinator, .. } => coordinator.store().insert(record).await,
            AppServices::Persistent { coordinator, .. } => {
                coordinator.store().insert(record).await
            }
        }
    }
}
