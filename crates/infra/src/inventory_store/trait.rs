use std::sync::Arc;

use async_trait::async_trait;

use wms_inventory::{Counter, InventoryKey, InventoryRecord};

use crate::db::StoreError;

/// Persistence engine for inventory records.
///
/// ## Implementation Requirements
///
/// Implementations must:
/// - keep every counter `>= 0` on every write path
/// - evaluate a decrement guard and apply the write as **one** atomic step
///   (never a read followed by a separate write)
/// - serialize transactions touching the same `(sku, hub)` row: one commits
///   or rolls back before the other's guard is evaluated
/// - never share a lock between different rows
/// - roll back a transaction that is dropped without `commit`
#[async_trait]
pub trait InventoryStore: Send + Sync {
    type Tx: InventoryTx;

    /// Open a transaction scope.
    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    /// Point lookup by composite key.
    async fn get(&self, key: InventoryKey) -> Result<Option<InventoryRecord>, StoreError>;

    /// Insert a new record. Fails with `Conflict` if the pair already exists.
    async fn insert(&self, record: &InventoryRecord) -> Result<(), StoreError>;
}

/// An open transaction against an [`InventoryStore`].
#[async_trait]
pub trait InventoryTx: Send {
    /// Subtract `qty` from `counter` on the row matching `key`, only if the
    /// counter currently holds at least `qty`, refreshing `updated_at` in the
    /// same step.
    ///
    /// Returns the number of rows affected: `0` when the guard failed or the
    /// row does not exist.
    async fn decrement_guarded(
        &mut self,
        key: InventoryKey,
        counter: Counter,
        qty: i64,
    ) -> Result<u64, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;

    async fn rollback(self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    type Tx = S::Tx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        (**self).begin().await
    }

    async fn get(&self, key: InventoryKey) -> Result<Option<InventoryRecord>, StoreError> {
        (**self).get(key).await
    }

    async fn insert(&self, record: &InventoryRecord) -> Result<(), StoreError> {
        (**self).insert(record).await
    }
}
