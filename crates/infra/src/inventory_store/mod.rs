//! Inventory record store boundary.
//!
//! The store owns the authoritative stock counters. Counters change only
//! through guarded decrements issued inside a transaction (see
//! [`InventoryTx::decrement_guarded`]).

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::{InMemoryInventoryStore, InMemoryInventoryTx};
pub use postgres::{PgInventoryTx, PostgresInventoryStore};
pub use r#trait::{InventoryStore, InventoryTx};
