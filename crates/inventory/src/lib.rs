//! Inventory domain module.
//!
//! Stock counters per (SKU, hub) pair and the validation of quantity
//! adjustments. Pure domain logic: no IO, no HTTP, no storage.

pub mod adjustment;
pub mod record;

pub use adjustment::{AdjustmentRequest, ValidatedAdjustment};
pub use record::{Counter, InventoryKey, InventoryRecord, Location, NewInventoryRecord, Thresholds};
