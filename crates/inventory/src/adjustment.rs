//! Quantity adjustment requests and their validation.

use serde::{Deserialize, Serialize};

use wms_core::{DomainError, DomainResult, HubId, SkuId};

use crate::record::{Counter, InventoryKey};

/// Request to subtract quantities from the counters of one inventory record.
///
/// A zero delta leaves that counter alone. Identifiers are optional here so
/// that a missing id surfaces as a validation failure instead of a
/// deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentRequest {
    pub sku_id: Option<SkuId>,
    pub hub_id: Option<HubId>,
    #[serde(default)]
    pub available_qty: i64,
    #[serde(default)]
    pub allocated_qty: i64,
    #[serde(default)]
    pub damaged_qty: i64,
}

impl AdjustmentRequest {
    pub fn new(sku_id: SkuId, hub_id: HubId) -> Self {
        Self {
            sku_id: Some(sku_id),
            hub_id: Some(hub_id),
            ..Default::default()
        }
    }

    pub fn available(mut self, qty: i64) -> Self {
        self.available_qty = qty;
        self
    }

    pub fn allocated(mut self, qty: i64) -> Self {
        self.allocated_qty = qty;
        self
    }

    pub fn damaged(mut self, qty: i64) -> Self {
        self.damaged_qty = qty;
        self
    }

    fn delta(&self, counter: Counter) -> i64 {
        match counter {
            Counter::Available => self.available_qty,
            Counter::Allocated => self.allocated_qty,
            Counter::Damaged => self.damaged_qty,
        }
    }

    /// Reject missing/nil identifiers and negative deltas.
    pub fn validate(&self) -> DomainResult<ValidatedAdjustment> {
        let sku_id = self
            .sku_id
            .ok_or_else(|| DomainError::invalid_id("sku_id is required"))?
            .ensure_present()?;
        let hub_id = self
            .hub_id
            .ok_or_else(|| DomainError::invalid_id("hub_id is required"))?
            .ensure_present()?;

        let mut decrements = Vec::with_capacity(Counter::ALL.len());
        for counter in Counter::ALL {
            let qty = self.delta(counter);
            if qty < 0 {
                return Err(DomainError::validation(format!(
                    "{counter} quantity cannot be negative"
                )));
            }
            if qty > 0 {
                decrements.push((counter, qty));
            }
        }

        Ok(ValidatedAdjustment {
            key: InventoryKey::new(sku_id, hub_id),
            decrements,
        })
    }
}

/// An adjustment that passed validation.
///
/// Holds only the non-zero decrements, in [`Counter::ALL`] order. The only way
/// to obtain one is [`AdjustmentRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAdjustment {
    key: InventoryKey,
    decrements: Vec<(Counter, i64)>,
}

impl ValidatedAdjustment {
    pub fn key(&self) -> InventoryKey {
        self.key
    }

    /// Non-zero decrements in fixed counter order. Every quantity is `> 0`.
    pub fn decrements(&self) -> &[(Counter, i64)] {
        &self.decrements
    }

    /// True when every delta was zero.
    pub fn is_noop(&self) -> bool {
        self.decrements.is_empty()
    }
}
