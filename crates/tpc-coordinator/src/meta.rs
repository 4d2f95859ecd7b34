use std::{
    collections::HashMap,
    sync::RwLock,
};

use ethers::types::Address;

/// Coordinator-only bookkeeping recorded at `Prepare` time and consumed during `Commit`'s
/// on-chain sub-phases: the recipient and value every shard's `lock`/`commit` call uses for this
/// transaction. Discarded once `Commit`'s on-chain finalize sub-phase completes.
#[derive(Clone, Copy, Debug)]
pub struct TxOnChainMeta {
    pub recipient: Address,
    pub amount: u64,
}

/// A concurrent-safe map from transaction id to its [`TxOnChainMeta`].
#[derive(Default)]
pub struct TxMetaStore {
    inner: RwLock<HashMap<String, TxOnChainMeta>>,
}

impl TxMetaStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, tx_id: &str, meta: TxOnChainMeta) {
        self.inner.write().expect("tx meta lock poisoned").insert(tx_id.to_string(), meta);
    }

    #[must_use]
    pub fn get(&self, tx_id: &str) -> Option<TxOnChainMeta> {
        self.inner.read().expect("tx meta lock poisoned").get(tx_id).copied()
    }

    /// Discards the recorded metadata for `tx_id`. Called once after `Commit`'s on-chain
    /// finalize sub-phase; a transaction id absent here by the time `Abort` runs is not an
    /// error, `Abort` does not need recipient/amount to reclaim.
    pub fn discard(&self, tx_id: &str) {
        self.inner.write().expect("tx meta lock poisoned").remove(tx_id);
    }
}

#[cfg(test)]
mod tests {
    use ethers::types::Address;

    use super::{
        TxMetaStore,
        TxOnChainMeta,
    };

    #[test]
    fn records_and_discards() {
        let store = TxMetaStore::new();
        let meta = TxOnChainMeta {
            recipient: Address::zero(),
            amount: 100,
        };
        store.record("tx1", meta);
        assert_eq!(store.get("tx1").map(|m| m.amount), Some(100));
        store.discard("tx1");
        assert!(store.get("tx1").is_none());
    }
}
