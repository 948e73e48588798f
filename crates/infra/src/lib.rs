//! Infrastructure layer: stores, the adjustment pipeline, config, database wiring.

pub mod adjustment_coordinator;
pub mod catalog_store;
pub mod config;
pub mod db;
pub mod inventory_store;
pub mod quantity_adjuster;

pub use adjustment_coordinator::{AdjustmentCoordinator, AdjustmentError};
pub use db::StoreError;
