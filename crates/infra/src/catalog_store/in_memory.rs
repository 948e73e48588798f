use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use wms_catalog::{Hub, Sku};
use wms_core::{HubId, SkuId};

use super::CatalogStore;
use crate::db::StoreError;

/// In-memory catalog store.
///
/// Intended for tests/dev.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogStore {
    hubs: Arc<RwLock<HashMap<HubId, Hub>>>,
    skus: Arc<RwLock<HashMap<SkuId, Sku>>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::storage("lock poisoned")
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert_hub(&self, hub: &Hub) -> Result<(), StoreError> {
        let mut hubs = self.hubs.write().map_err(poisoned)?;
        if hubs.contains_key(&hub.id) {
            return Err(StoreError::Conflict(format!("hub {}", hub.id)));
        }
        hubs.insert(hub.id, hub.clone());
        Ok(())
    }

    async fn list_hubs(&self) -> Result<Vec<Hub>, StoreError> {
        let hubs = self.hubs.read().map_err(poisoned)?;
        let mut out: Vec<Hub> = hubs.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn get_hub(&self, id: HubId) -> Result<Option<Hub>, StoreError> {
        Ok(self.hubs.read().map_err(poisoned)?.get(&id).cloned())
    }

    async fn insert_sku(&self, sku: &Sku) -> Result<(), StoreError> {
        let mut skus = self.skus.write().map_err(poisoned)?;
        if skus.contains_key(&sku.id) {
            return Err(StoreError::Conflict(format!("sku {}", sku.id)));
        }
        skus.insert(sku.id, sku.clone());
        Ok(())
    }

    async fn list_skus(&self) -> Result<Vec<Sku>, StoreError> {
        let skus = self.skus.read().map_err(poisoned)?;
        let mut out: Vec<Sku> = skus.values().cloned().collect();
        out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn get_sku(&self, id: SkuId) -> Result<Option<Sku>, StoreError> {
        Ok(self.skus.read().map_err(poisoned)?.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use wms_catalog::{NewHub, NewSku};
    use wms_core::{SellerId, TenantId};

    use super::*;

    fn hub(name: &str, offset_secs: i64) -> Hub {
        NewHub {
            tenant_id: Some(TenantId::new()),
            name: name.to_string(),
            code: name.to_uppercase(),
            address: "1 Dock Road".to_string(),
            ..Default::default()
        }
        .into_hub(HubId::new(), Utc::now() + Duration::seconds(offset_secs))
        .unwrap()
    }

    #[tokio::test]
    async fn hubs_list_oldest_first() {
        let store = InMemoryCatalogStore::new();
        let later = hub("later", 10);
        let earlier = hub("earlier", 0);
        store.insert_hub(&later).await.unwrap();
        store.insert_hub(&earlier).await.unwrap();

        let names: Vec<String> = store
            .list_hubs()
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["earlier", "later"]);
    }

    #[tokio::test]
    async fn duplicate_hub_id_conflicts() {
        let store = InMemoryCatalogStore::new();
        let h = hub("north", 0);
        store.insert_hub(&h).await.unwrap();
        assert!(matches!(store.insert_hub(&h).await, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn sku_lookup_by_id() {
        let store = InMemoryCatalogStore::new();
        let sku = NewSku {
            seller_id: Some(SellerId::new()),
            name: "Widget".to_string(),
            code: "W-1".to_string(),
            uom: "each".to_string(),
            ..Default::default()
        }
        .into_sku(SkuId::new(), Utc::now())
        .unwrap();
        store.insert_sku(&sku).await.unwrap();

        assert_eq!(store.get_sku(sku.id).await.unwrap(), Some(sku));
        assert_eq!(store.get_sku(SkuId::new()).await.unwrap(), None);
    }
}
