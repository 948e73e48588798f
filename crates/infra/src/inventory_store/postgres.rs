//! Postgres-backed inventory store.
//!
//! The guarded decrement is a single conditional `UPDATE`: Postgres takes the
//! row lock, re-evaluates the `WHERE` guard against the latest committed
//! version, and writes, all in one statement. Under the default READ
//! COMMITTED isolation a second writer on the same row blocks until the first
//! transaction ends and then sees its result, so two decrements can never both
//! pass a stale check. The `CHECK (... >= 0)` column constraints back this up
//! for every other write path.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Row, Transaction};
use tracing::instrument;

use wms_core::{HubId, SkuId};
use wms_inventory::{Counter, InventoryKey, InventoryRecord, Location, Thresholds};

use super::r#trait::{InventoryStore, InventoryTx};
use crate::db::{map_sqlx_error, StoreError};

/// Postgres-backed inventory store.
///
/// Uses the SQLx connection pool, which is thread-safe (Arc + Send + Sync).
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    /// Create a new PostgresInventoryStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

/// One statement per counter. Column names cannot be bound as parameters, so
/// each variant is spelled out.
fn decrement_sql(counter: Counter) -> &'static str {
    match counter {
        Counter::Available => {
            r#"
            UPDATE inventories
            SET available_qty = available_qty - $1, updated_at = NOW()
            WHERE sku_id = $2 AND hub_id = $3 AND available_qty >= $1
            "#
        }
        Counter::Allocated => {
            r#"
            UPDATE inventories
            SET allocated_qty = allocated_qty - $1, updated_at = NOW()
            WHERE sku_id = $2 AND hub_id = $3 AND allocated_qty >= $1
            "#
        }
        Counter::Damaged => {
            r#"
            UPDATE inventories
            SET damaged_qty = damaged_qty - $1, updated_at = NOW()
            WHERE sku_id = $2 AND hub_id = $3 AND damaged_qty >= $1
            "#
        }
    }
}

#[async_trait]
impl InventoryStore for PostgresInventoryStore {
    type Tx = PgInventoryTx;

    #[instrument(skip_all, fields(operation = "begin_transaction"), err)]
    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;
        Ok(PgInventoryTx { tx })
    }

    #[instrument(
        skip(self),
        fields(sku_id = %key.sku_id, hub_id = %key.hub_id),
        err
    )]
    async fn get(&self, key: InventoryKey) -> Result<Option<InventoryRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                sku_id,
                hub_id,
                available_qty,
                allocated_qty,
                damaged_qty,
                zone,
                rack,
                bin,
                min_threshold,
                max_threshold,
                created_at,
                updated_at
            FROM inventories
            WHERE sku_id = $1 AND hub_id = $2
            "#,
        )
        .bind(key.sku_id.as_uuid())
        .bind(key.hub_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_inventory", e))?;

        row.map(|r| {
            InventoryRow::from_row(&r)
                .map(InventoryRecord::from)
                .map_err(|e| StoreError::storage(format!("failed to decode inventory row: {e}")))
        })
        .transpose()
    }

    #[instrument(
        skip(self, record),
        fields(sku_id = %record.sku_id, hub_id = %record.hub_id),
        err
    )]
    async fn insert(&self, record: &InventoryRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO inventories (
                sku_id,
                hub_id,
                available_qty,
                allocated_qty,
                damaged_qty,
                zone,
                rack,
                bin,
                min_threshold,
                max_threshold,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(record.sku_id.as_uuid())
        .bind(record.hub_id.as_uuid())
        .bind(record.available_qty)
        .bind(record.allocated_qty)
        .bind(record.damaged_qty)
        .bind(&record.location.zone)
        .bind(&record.location.rack)
        .bind(&record.location.bin)
        .bind(record.thresholds.min_threshold)
        .bind(record.thresholds.max_threshold)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_inventory", e))?;

        Ok(())
    }
}

/// Open Postgres transaction.
///
/// SQLx rolls the transaction back when it is dropped uncommitted, which
/// covers cancelled requests.
pub struct PgInventoryTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl InventoryTx for PgInventoryTx {
    #[instrument(
        skip_all,
        fields(sku_id = %key.sku_id, hub_id = %key.hub_id, %counter, qty),
        err
    )]
    async fn decrement_guarded(
        &mut self,
        key: InventoryKey,
        counter: Counter,
        qty: i64,
    ) -> Result<u64, StoreError> {
        let result = sqlx::query(decrement_sql(counter))
            .bind(qty)
            .bind(key.sku_id.as_uuid())
            .bind(key.hub_id.as_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("decrement_guarded", e))?;

        Ok(result.rows_affected())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }

    async fn rollback(self) -> Result<(), StoreError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| map_sqlx_error("rollback", e))
    }
}

// SQLx row types

#[derive(Debug)]
struct InventoryRow {
    sku_id: uuid::Uuid,
    hub_id: uuid::Uuid,
    available_qty: i64,
    allocated_qty: i64,
    damaged_qty: i64,
    zone: Option<String>,
    rack: Option<String>,
    bin: Option<String>,
    min_threshold: i64,
    max_threshold: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for InventoryRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryRow {
            sku_id: row.try_get("sku_id")?,
            hub_id: row.try_get("hub_id")?,
            available_qty: row.try_get("available_qty")?,
            allocated_qty: row.try_get("allocated_qty")?,
            damaged_qty: row.try_get("damaged_qty")?,
            zone: row.try_get("zone")?,
            rack: row.try_get("rack")?,
            bin: row.try_get("bin")?,
            min_threshold: row.try_get("min_threshold")?,
            max_threshold: row.try_get("max_threshold")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<InventoryRow> for InventoryRecord {
    fn from(row: InventoryRow) -> Self {
        InventoryRecord {
            sku_id: SkuId::from_uuid(row.sku_id),
            hub_id: HubId::from_uuid(row.hub_id),
            available_qty: row.available_qty,
            allocated_qty: row.allocated_qty,
            damaged_qty: row.damaged_qty,
            location: Location {
                zone: row.zone,
                rack: row.rack,
                bin: row.bin,
            },
            thresholds: Thresholds {
                min_threshold: row.min_threshold,
                max_threshold: row.max_threshold,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
