//! Single-counter guarded decrement.
//!
//! Translates the affected-row count of one conditional update into an
//! adjustment outcome:
//!
//! | rows | outcome |
//! |---|---|
//! | 1 | success |
//! | 0 | `InsufficientQuantity` (guard failed or row absent) |
//! | >1 | `Storage` (composite key is not unique) |
//!
//! No retries happen here; the caller owns the transaction.

use tracing::{debug, info, warn};

use wms_inventory::{Counter, InventoryKey};

use crate::adjustment_coordinator::AdjustmentError;
use crate::inventory_store::InventoryTx;

/// Subtract `qty` (> 0) from `counter` on `key` inside `tx`.
pub async fn decrement<T>(
    tx: &mut T,
    key: InventoryKey,
    counter: Counter,
    qty: i64,
) -> Result<(), AdjustmentError>
where
    T: InventoryTx,
{
    let affected = tx
        .decrement_guarded(key, counter, qty)
        .await
        .map_err(|e| {
            warn!(%key, %counter, qty, error = %e, "guarded decrement failed in storage");
            AdjustmentError::from(e)
        })?;

    match affected {
        1 => {
            debug!(%key, %counter, qty, "counter decremented");
            Ok(())
        }
        0 => {
            info!(%key, %counter, qty, "insufficient quantity");
            Err(AdjustmentError::InsufficientQuantity {
                counter,
                sku_id: key.sku_id,
                hub_id: key.hub_id,
                requested: qty,
            })
        }
        n => {
            warn!(%key, %counter, rows = n, "guarded decrement matched more than one row");
            Err(AdjustmentError::Storage(format!(
                "decrement of {counter} on {key} affected {n} rows"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use wms_core::{HubId, SkuId};

    use super::*;
    use crate::db::StoreError;

    /// Transaction double that reports a fixed affected-row count.
    struct FixedRows(Result<u64, StoreError>);

    #[async_trait]
    impl InventoryTx for FixedRows {
        async fn decrement_guarded(
            &mut self,
            _key: InventoryKey,
            _counter: Counter,
            _qty: i64,
        ) -> Result<u64, StoreError> {
            self.0.clone()
        }

        async fn commit(self) -> Result<(), StoreError> {
            Ok(())
        }

        async fn rollback(self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn key() -> InventoryKey {
        InventoryKey::new(SkuId::new(), HubId::new())
    }

    #[tokio::test]
    async fn one_row_is_success() {
        let mut tx = FixedRows(Ok(1));
        assert_eq!(decrement(&mut tx, key(), Counter::Available, 3).await, Ok(()));
    }

    #[tokio::test]
    async fn zero_rows_is_insufficient_quantity() {
        let k = key();
        let mut tx = FixedRows(Ok(0));
        assert_eq!(
            decrement(&mut tx, k, Counter::Damaged, 2).await,
            Err(AdjustmentError::InsufficientQuantity {
                counter: Counter::Damaged,
                sku_id: k.sku_id,
                hub_id: k.hub_id,
                requested: 2,
            })
        );
    }

    #[tokio::test]
    async fn many_rows_is_storage_failure() {
        let mut tx = FixedRows(Ok(2));
        let err = decrement(&mut tx, key(), Counter::Allocated, 1).await.unwrap_err();
        assert!(matches!(err, AdjustmentError::Storage(_)));
    }

    #[tokio::test]
    async fn engine_errors_become_storage_failures() {
        let mut tx = FixedRows(Err(StoreError::storage("connection reset")));
        let err = decrement(&mut tx, key(), Counter::Available, 1).await.unwrap_err();
        assert_eq!(err, AdjustmentError::Storage("storage error: connection reset".to_string()));
    }
}
