//! Multi-counter stock adjustment pipeline.
//!
//! ## Execution Flow
//!
//! ```text
//! AdjustmentRequest
//!   ↓
//! 1. Validate (ids present, deltas non-negative) → ValidatedAdjustment
//!   ↓
//! 2. All deltas zero? → success, no transaction opened
//!   ↓
//! 3. Begin transaction
//!   ↓
//! 4. Guarded decrement per non-zero counter: available → allocated → damaged
//!   ↓
//! 5. First failure → rollback, return it; otherwise commit
//! ```
//!
//! Later counters are not attempted once one fails. Nothing is retried: a
//! failed guard is a business outcome and storage errors are surfaced as-is.
//!
//! Adjustments are not idempotent. Replaying a request decrements again.

use thiserror::Error;
use tracing::{info, instrument, warn};

use wms_core::{DomainError, HubId, SkuId};
use wms_inventory::{AdjustmentRequest, Counter, ValidatedAdjustment};

use crate::db::StoreError;
use crate::inventory_store::{InventoryStore, InventoryTx};
use crate::quantity_adjuster;

/// Failure of a stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjustmentError {
    /// Missing identifier or negative quantity. Storage was never touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The guard on `counter` failed (or the row does not exist). The whole
    /// adjustment was rolled back.
    #[error("insufficient {counter} for sku {sku_id} at hub {hub_id}: requested {requested}")]
    InsufficientQuantity {
        counter: Counter,
        sku_id: SkuId,
        hub_id: HubId,
        requested: i64,
    },

    /// The storage engine failed. The adjustment was rolled back.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl From<DomainError> for AdjustmentError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                AdjustmentError::InvalidInput(msg)
            }
        }
    }
}

impl From<StoreError> for AdjustmentError {
    fn from(value: StoreError) -> Self {
        AdjustmentError::Storage(value.to_string())
    }
}

/// Applies validated adjustments atomically against an [`InventoryStore`].
///
/// The store handle is injected at construction; there is no global
/// repository. Cloning the coordinator is as cheap as cloning `S`.
#[derive(Debug, Clone)]
pub struct AdjustmentCoordinator<S> {
    store: S,
}

impl<S> AdjustmentCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S> AdjustmentCoordinator<S>
where
    S: InventoryStore,
{
    /// Validate and apply a raw request.
    pub async fn adjust(&self, request: &AdjustmentRequest) -> Result<(), AdjustmentError> {
        let validated = request.validate().map_err(|e| {
            info!(error = %e, "adjustment rejected");
            AdjustmentError::from(e)
        })?;
        self.apply_adjustment(&validated).await
    }

    /// Apply every non-zero decrement in one transaction.
    ///
    /// On any failure the transaction is rolled back and the first failure is
    /// returned unchanged. If the rollback itself fails the original error
    /// still wins; the dropped transaction handle rolls back regardless.
    #[instrument(
        skip(self, adjustment),
        fields(
            operation = "apply_adjustment",
            sku_id = %adjustment.key().sku_id,
            hub_id = %adjustment.key().hub_id,
        )
    )]
    pub async fn apply_adjustment(
        &self,
        adjustment: &ValidatedAdjustment,
    ) -> Result<(), AdjustmentError> {
        if adjustment.is_noop() {
            return Ok(());
        }

        let key = adjustment.key();
        let mut tx = self.store.begin().await.map_err(|e| {
            warn!(error = %e, "failed to open transaction");
            AdjustmentError::from(e)
        })?;

        for &(counter, qty) in adjustment.decrements() {
            if let Err(err) = quantity_adjuster::decrement(&mut tx, key, counter, qty).await {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "rollback failed");
                }
                return Err(err);
            }
        }

        tx.commit().await.map_err(|e| {
            warn!(error = %e, "commit failed");
            AdjustmentError::from(e)
        })?;

        info!(decrements = adjustment.decrements().len(), "adjustment applied");
        Ok(())
    }
}
