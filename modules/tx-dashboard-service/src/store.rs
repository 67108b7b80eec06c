//! Transaction store
//!
//! Single owner of the transaction list and its aggregate counts. Every
//! mutation recomputes the stats from scratch and writes the whole state back
//! to the key-value store before returning.

use parking_lot::Mutex;
use std::sync::Arc;
use tx_dashboard_types::{
    STATE_SCHEMA_VERSION, Transaction, TransactionState, TransactionStats,
};

use crate::error::DashboardError;
use crate::kv::KvStore;

/// Key the serialized state lives under
pub const STATE_KEY: &str = "transactionState";

pub struct TransactionStore {
    state: Mutex<TransactionState>,
    kv: Arc<dyn KvStore>,
}

impl TransactionStore {
    /// Create a store primed from whatever was persisted last.
    pub fn open(kv: Arc<dyn KvStore>) -> Self {
        let state = Self::load(kv.as_ref());
        log::info!(
            "[TxStore] Loaded {} transactions ({} pending)",
            state.stats.total,
            state.stats.pending
        );
        Self {
            state: Mutex::new(state),
            kv,
        }
    }

    /// Read persisted state. Missing, unreadable or unknown-version data all
    /// yield the empty state; stats are always recomputed.
    pub fn load(kv: &dyn KvStore) -> TransactionState {
        let raw = match kv.get(STATE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return TransactionState::default(),
            Err(e) => {
                log::error!("[TxStore] Failed to read persisted state: {}", e);
                return TransactionState::default();
            }
        };

        let mut state: TransactionState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                log::warn!("[TxStore] Discarding corrupt persisted state: {}", e);
                return TransactionState::default();
            }
        };

        if state.version > STATE_SCHEMA_VERSION {
            log::warn!(
                "[TxStore] Discarding persisted state with unknown version {}",
                state.version
            );
            return TransactionState::default();
        }

        state.version = STATE_SCHEMA_VERSION;
        state.recompute_stats();
        state
    }

    /// Prepend a transaction. An existing record with the same id is dropped
    /// so ids stay unique.
    pub fn insert(&self, tx: Transaction) {
        let mut state = self.state.lock();
        log::info!(
            "[TxStore] Inserting {} ({}) to {}",
            tx.id,
            tx.status,
            tx.receiver_address
        );
        state.transactions.retain(|existing| existing.id != tx.id);
        state.transactions.insert(0, tx);
        state.recompute_stats();
        self.persist(&state);
    }

    /// Replace the record sharing `tx.id`, keeping its position. `loading`
    /// drops once nothing is pending anymore.
    ///
    /// Unknown ids are ignored and nothing is written; returns whether a
    /// record was replaced.
    pub fn update(&self, tx: Transaction) -> bool {
        let mut state = self.state.lock();
        if !Self::replace(&mut state, tx) {
            return false;
        }
        self.persist(&state);
        true
    }

    /// `update` plus setting the error banner, under one lock with one write.
    ///
    /// When the id is gone (the state was cleared meanwhile) neither field is
    /// touched and nothing is written.
    pub fn update_with_error(&self, tx: Transaction, error: Option<String>) -> bool {
        let mut state = self.state.lock();
        if !Self::replace(&mut state, tx) {
            return false;
        }
        state.error = error;
        self.persist(&state);
        true
    }

    pub fn set_loading(&self, loading: bool) {
        let mut state = self.state.lock();
        state.loading = loading;
        self.persist(&state);
    }

    pub fn set_error(&self, error: Option<String>) {
        let mut state = self.state.lock();
        state.error = error;
        self.persist(&state);
    }

    /// Drop everything, in memory and on disk.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        *state = TransactionState::default();
        if let Err(e) = self.kv.remove(STATE_KEY) {
            log::error!("[TxStore] Failed to remove persisted state: {}", e);
        }
        log::info!("[TxStore] Cleared transaction state");
    }

    pub fn snapshot(&self) -> TransactionState {
        self.state.lock().clone()
    }

    /// Newest first
    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.lock().transactions.clone()
    }

    pub fn get(&self, id: &str) -> Option<Transaction> {
        self.state
            .lock()
            .transactions
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
    }

    pub fn stats(&self) -> TransactionStats {
        self.state.lock().stats
    }

    fn replace(state: &mut TransactionState, tx: Transaction) -> bool {
        let Some(slot) = state.transactions.iter_mut().find(|t| t.id == tx.id) else {
            log::debug!("[TxStore] Ignoring update for unknown transaction {}", tx.id);
            return false;
        };
        log::info!("[TxStore] Updating {} status to {}", tx.id, tx.status);
        *slot = tx;
        state.recompute_stats();
        if state.stats.pending == 0 {
            state.loading = false;
        }
        true
    }

    /// Write failures are logged and the in-memory state stays authoritative.
    fn persist(&self, state: &TransactionState) {
        if let Err(e) = self.save(state) {
            log::error!("[TxStore] {}", e);
        }
    }

    fn save(&self, state: &TransactionState) -> Result<(), DashboardError> {
        let raw = serde_json::to_string(state)
            .map_err(|e| DashboardError::Persistence(format!("Failed to serialize state: {}", e)))?;
        self.kv
            .set(STATE_KEY, &raw)
            .map_err(DashboardError::Persistence)
    }
}
