//! Hub and SKU registry stores.
//!
//! Both engines expose the same object-safe trait so the API layer can hold
//! either behind an `Arc<dyn CatalogStore>`.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;

use wms_catalog::{Hub, Sku};
use wms_core::{HubId, SkuId};

use crate::db::StoreError;

pub use in_memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;

/// Persistence for catalog records.
///
/// Records arrive already validated; stores only enforce id uniqueness.
/// Listings are ordered by creation time, oldest first.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_hub(&self, hub: &Hub) -> Result<(), StoreError>;

    async fn list_hubs(&self) -> Result<Vec<Hub>, StoreError>;

    async fn get_hub(&self, id: HubId) -> Result<Option<Hub>, StoreError>;

    async fn insert_sku(&self, sku: &Sku) -> Result<(), StoreError>;

    async fn list_skus(&self) -> Result<Vec<Sku>, StoreError>;

    async fn get_sku(&self, id: SkuId) -> Result<Option<Sku>, StoreError>;
}

#[async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn insert_hub(&self, hub: &Hub) -> Result<(), StoreError> {
        (**self).insert_hub(hub).await
    }

    async fn list_hubs(&self) -> Result<Vec<Hub>, StoreError> {
        (**self).list_hubs().await
    }

    async fn get_hub(&self, id: HubId) -> Result<Option<Hub>, StoreError> {
        (**self).get_hub(id).await
    }

    async fn insert_sku(&self, sku: &Sku) -> Result<(), StoreError> {
        (**self).insert_sku(sku).await
    }

    async fn list_skus(&self) -> Result<Vec<Sku>, StoreError> {
        (**self).list_skus().await
    }

    async fn get_sku(&self, id: SkuId) -> Result<Option<Sku>, StoreError> {
        (**self).get_sku(id).await
    }
}
