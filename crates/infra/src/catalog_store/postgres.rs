//! Postgres-backed catalog store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use tracing::instrument;

use wms_catalog::{Hub, Sku};
use wms_core::{HubId, SellerId, SkuId, TenantId};

use super::CatalogStore;
use crate::db::{map_sqlx_error, StoreError};

const HUB_COLUMNS: &str = "id, tenant_id, name, code, address, city, state, country, pincode, \
                           location, created_at, updated_at";

const SKU_COLUMNS: &str = "id, seller_id, name, code, description, category, subcategory, brand, \
                           model, uom, weight, dimensions, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn decode<T>(row: &PgRow) -> Result<T, StoreError>
where
    T: for<'r> FromRow<'r, PgRow>,
{
    T::from_row(row).map_err(|e| StoreError::storage(format!("failed to decode row: {e}")))
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self, hub), fields(hub_id = %hub.id), err)]
    async fn insert_hub(&self, hub: &Hub) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO hubs (
                id, tenant_id, name, code, address, city, state, country, pincode,
                location, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(hub.id.as_uuid())
        .bind(hub.tenant_id.as_uuid())
        .bind(&hub.name)
        .bind(&hub.code)
        .bind(&hub.address)
        .bind(&hub.city)
        .bind(&hub.state)
        .bind(&hub.country)
        .bind(&hub.pincode)
        .bind(&hub.location)
        .bind(hub.created_at)
        .bind(hub.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_hub", e))?;

        Ok(())
    }

    async fn list_hubs(&self) -> Result<Vec<Hub>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {HUB_COLUMNS} FROM hubs ORDER BY created_at, id"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_hubs", e))?;

        rows.iter()
            .map(|r| decode::<HubRow>(r).map(Hub::from))
            .collect()
    }

    async fn get_hub(&self, id: HubId) -> Result<Option<Hub>, StoreError> {
        let row = sqlx::query(&format!("SELECT {HUB_COLUMNS} FROM hubs WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_hub", e))?;

        row.as_ref()
            .map(|r| decode::<HubRow>(r).map(Hub::from))
            .transpose()
    }

    #[instrument(skip(self, sku), fields(sku_id = %sku.id), err)]
    async fn insert_sku(&self, sku: &Sku) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO skus (
                id, seller_id, name, code, description, category, subcategory, brand,
                model, uom, weight, dimensions, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(sku.id.as_uuid())
        .bind(sku.seller_id.as_uuid())
        .bind(&sku.name)
        .bind(&sku.code)
        .bind(&sku.description)
        .bind(&sku.category)
        .bind(&sku.subcategory)
        .bind(&sku.brand)
        .bind(&sku.model)
        .bind(&sku.uom)
        .bind(sku.weight)
        .bind(&sku.dimensions)
        .bind(sku.created_at)
        .bind(sku.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_sku", e))?;

        Ok(())
    }

    async fn list_skus(&self) -> Result<Vec<Sku>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {SKU_COLUMNS} FROM skus ORDER BY created_at, id"
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_skus", e))?;

        rows.iter()
            .map(|r| decode::<SkuRow>(r).map(Sku::from))
            .collect()
    }

    async fn get_sku(&self, id: SkuId) -> Result<Option<Sku>, StoreError> {
        let row = sqlx::query(&format!("SELECT {SKU_COLUMNS} FROM skus WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_sku", e))?;

        row.as_ref()
            .map(|r| decode::<SkuRow>(r).map(Sku::from))
            .transpose()
    }
}

// SQLx row types

#[derive(Debug)]
struct HubRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    name: String,
    code: String,
    address: String,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    pincode: Option<String>,
    location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for HubRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(HubRow {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            country: row.try_get("country")?,
            pincode: row.try_get("pincode")?,
            location: row.try_get("location")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<HubRow> for Hub {
    fn from(row: HubRow) -> Self {
        Hub {
            id: HubId::from_uuid(row.id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            name: row.name,
            code: row.code,
            address: row.address,
            city: row.city,
            state: row.state,
            country: row.country,
            pincode: row.pincode,
            location: row.location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug)]
struct SkuRow {
    id: uuid::Uuid,
    seller_id: uuid::Uuid,
    name: String,
    code: String,
    description: String,
    category: String,
    subcategory: String,
    brand: String,
    model: String,
    uom: String,
    weight: f64,
    dimensions: JsonValue,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for SkuRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(SkuRow {
            id: row.try_get("id")?,
            seller_id: row.try_get("seller_id")?,
            name: row.try_get("name")?,
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            category: row.try_get("category")?,
            subcategory: row.try_get("subcategory")?,
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            uom: row.try_get("uom")?,
            weight: row.try_get("weight")?,
            dimensions: row.try_get("dimensions")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<SkuRow> for Sku {
    fn from(row: SkuRow) -> Self {
        Sku {
            id: SkuId::from_uuid(row.id),
            seller_id: SellerId::from_uuid(row.seller_id),
            name: row.name,
            code: row.code,
            description: row.description,
            category: row.category,
            subcategory: row.subcategory,
            brand: row.brand,
            model: row.model,
            uom: row.uom,
            weight: row.weight,
            dimensions: row.dimensions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
