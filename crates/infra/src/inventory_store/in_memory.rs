use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use wms_inventory::{Counter, InventoryKey, InventoryRecord};

use super::r#trait::{InventoryStore, InventoryTx};
use crate::db::StoreError;

type RowLock = Arc<Mutex<InventoryRecord>>;
type Rows = Arc<RwLock<HashMap<InventoryKey, RowLock>>>;

/// In-memory inventory store.
///
/// Intended for tests/dev. Each row sits behind its own async mutex, which a
/// transaction holds from its first write on that row until commit or
/// rollback. That gives the same same-row serialization as Postgres row locks
/// while leaving different rows independent. Point reads wait for an open
/// transaction on the row to finish.
#[derive(Debug, Default, Clone)]
pub struct InMemoryInventoryStore {
    rows: Rows,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(&self, key: &InventoryKey) -> Result<Option<RowLock>, StoreError> {
        lookup(&self.rows, key)
    }
}

fn lookup(rows: &Rows, key: &InventoryKey) -> Result<Option<RowLock>, StoreError> {
    let rows = rows
        .read()
        .map_err(|_| StoreError::storage("lock poisoned"))?;
    Ok(rows.get(key).cloned())
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    type Tx = InMemoryInventoryTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError> {
        Ok(InMemoryInventoryTx {
            rows: self.rows.clone(),
            held: HashMap::new(),
            finished: false,
        })
    }

    async fn get(&self, key: InventoryKey) -> Result<Option<InventoryRecord>, StoreError> {
        match self.row(&key)? {
            Some(row) => Ok(Some(row.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn insert(&self, record: &InventoryRecord) -> Result<(), StoreError> {
        let key = record.key();
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::storage("lock poisoned"))?;

        if rows.contains_key(&key) {
            return Err(StoreError::Conflict(format!("inventory {key}")));
        }
        rows.insert(key, Arc::new(Mutex::new(record.clone())));
        Ok(())
    }
}

/// A row locked by a transaction plus its value at lock time (undo image).
#[derive(Debug)]
struct HeldRow {
    guard: OwnedMutexGuard<InventoryRecord>,
    before: InventoryRecord,
}

/// Open transaction on an [`InMemoryInventoryStore`].
///
/// Dropping it without `commit` restores every touched row.
#[derive(Debug)]
pub struct InMemoryInventoryTx {
    rows: Rows,
    held: HashMap<InventoryKey, HeldRow>,
    finished: bool,
}

impl InMemoryInventoryTx {
    fn restore(&mut self) {
        for (_, mut row) in self.held.drain() {
            *row.guard = row.before;
        }
    }
}

#[async_trait]
impl InventoryTx for InMemoryInventoryTx {
    async fn decrement_guarded(
        &mut self,
        key: InventoryKey,
        counter: Counter,
        qty: i64,
    ) -> Result<u64, StoreError> {
        if !self.held.contains_key(&key) {
            let Some(row) = lookup(&self.rows, &key)? else {
                return Ok(0);
            };
            let guard = row.lock_owned().await;
            let before = guard.clone();
            self.held.insert(key, HeldRow { guard, before });
        }

        let Some(row) = self.held.get_mut(&key) else {
            return Ok(0);
        };
        Ok(u64::from(row.guard.try_decrement(counter, qty, Utc::now())))
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        self.finished = true;
        self.held.clear();
        Ok(())
    }

    async fn rollback(mut self) -> Result<(), StoreError> {
        self.restore();
        self.finished = true;
        Ok(())
    }
}

impl Drop for InMemoryInventoryTx {
    fn drop(&mut self) {
        if !self.finished {
            self.restore();
        }
    }
}
