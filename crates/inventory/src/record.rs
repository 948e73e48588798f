use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wms_core::{check_opt_len, DomainError, DomainResult, HubId, SkuId};

/// Composite identity of an inventory record: one row per (SKU, hub) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InventoryKey {
    pub sku_id: SkuId,
    pub hub_id: HubId,
}

impl InventoryKey {
    pub fn new(sku_id: SkuId, hub_id: HubId) -> Self {
        Self { sku_id, hub_id }
    }
}

impl core::fmt::Display for InventoryKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sku={} hub={}", self.sku_id, self.hub_id)
    }
}

/// One of the three tracked stock counters.
///
/// The declaration order is the order in which a multi-counter adjustment
/// touches them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Available,
    Allocated,
    Damaged,
}

impl Counter {
    /// All counters, in adjustment order.
    pub const ALL: [Counter; 3] = [Counter::Available, Counter::Allocated, Counter::Damaged];

    /// Persisted column name.
    pub fn column(self) -> &'static str {
        match self {
            Counter::Available => "available_qty",
            Counter::Allocated => "allocated_qty",
            Counter::Damaged => "damaged_qty",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Counter::Available => "available",
            Counter::Allocated => "allocated",
            Counter::Damaged => "damaged",
        }
    }
}

impl core::fmt::Display for Counter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Longest accepted zone, rack or bin label.
pub const LOCATION_MAX_LEN: usize = 50;

/// Physical placement inside a hub. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub bin: Option<String>,
}

/// Replenishment bounds. Informational only; adjustments never consult them.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub min_threshold: i64,
    pub max_threshold: i64,
}

/// Stock counters for one (SKU, hub) pair.
///
/// Every counter is `>= 0` at all times. Counters only move through guarded
/// decrements ([`InventoryRecord::try_decrement`] in memory, a conditional
/// `UPDATE` in Postgres).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub sku_id: SkuId,
    pub hub_id: HubId,
    pub available_qty: i64,
    pub allocated_qty: i64,
    pub damaged_qty: i64,
    #[serde(flatten)]
    pub location: Location,
    #[serde(flatten)]
    pub thresholds: Thresholds,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    pub fn key(&self) -> InventoryKey {
        InventoryKey::new(self.sku_id, self.hub_id)
    }

    pub fn counter(&self, counter: Counter) -> i64 {
        match counter {
            Counter::Available => self.available_qty,
            Counter::Allocated => self.allocated_qty,
            Counter::Damaged => self.damaged_qty,
        }
    }

    fn counter_mut(&mut self, counter: Counter) -> &mut i64 {
        match counter {
            Counter::Available => &mut self.available_qty,
            Counter::Allocated => &mut self.allocated_qty,
            Counter::Damaged => &mut self.damaged_qty,
        }
    }

    /// Subtract `qty` from `counter` only if the counter holds at least `qty`.
    ///
    /// Returns whether the guard was satisfied. On success `updated_at` is set
    /// to `now`; on failure the record is untouched.
    pub fn try_decrement(&mut self, counter: Counter, qty: i64, now: DateTime<Utc>) -> bool {
        let slot = self.counter_mut(counter);
        if *slot < qty {
            return false;
        }
        *slot -= qty;
        self.updated_at = now;
        true
    }
}

/// Input for creating an inventory record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewInventoryRecord {
    pub sku_id: Option<SkuId>,
    pub hub_id: Option<HubId>,
    #[serde(default)]
    pub available_qty: i64,
    #[serde(default)]
    pub allocated_qty: i64,
    #[serde(default)]
    pub damaged_qty: i64,
    #[serde(flatten)]
    pub location: Location,
    #[serde(flatten)]
    pub thresholds: Thresholds,
}

impl NewInventoryRecord {
    /// Validate and materialize the record with both timestamps set to `now`.
    pub fn into_record(self, now: DateTime<Utc>) -> DomainResult<InventoryRecord> {
        let sku_id = self
            .sku_id
            .ok_or_else(|| DomainError::invalid_id("sku_id is required"))?
            .ensure_present()?;
        let hub_id = self
            .hub_id
            .ok_or_else(|| DomainError::invalid_id("hub_id is required"))?
            .ensure_present()?;

        for (counter, qty) in [
            (Counter::Available, self.available_qty),
            (Counter::Allocated, self.allocated_qty),
            (Counter::Damaged, self.damaged_qty),
        ] {
            if qty < 0 {
                return Err(DomainError::validation(format!(
                    "{} quantity cannot be negative",
                    counter
                )));
            }
        }

        check_opt_len("zone", self.location.zone.as_deref(), LOCATION_MAX_LEN)?;
        check_opt_len("rack", self.location.rack.as_deref(), LOCATION_MAX_LEN)?;
        check_opt_len("bin", self.location.bin.as_deref(), LOCATION_MAX_LEN)?;

        let Thresholds {
            min_threshold,
            max_threshold,
        } = self.thresholds;
        if min_threshold < 0 || max_threshold < 0 {
            return Err(DomainError::validation("thresholds cannot be negative"));
        }
        if min_threshold > max_threshold {
            return Err(DomainError::validation(
                "min_threshold cannot exceed max_threshold",
            ));
        }

        Ok(InventoryRecord {
            sku_id,
            hub_id,
            available_qty: self.available_qty,
            allocated_qty: self.allocated_qty,
            damaged_qty: self.damaged_qty,
            location: self.location,
            thresholds: self.thresholds,
            created_at: now,
            updated_at: now,
        })
    }
}
