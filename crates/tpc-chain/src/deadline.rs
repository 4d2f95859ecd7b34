use std::{
    collections::HashMap,
    sync::{
        Arc,
        RwLock,
    },
};

use crate::{
    error::ChainError,
    oracle::BlockHeightOracle,
};

/// Translates a transaction's `timeout_blocks` into an absolute block-height deadline, and
/// answers expiry queries against a single chain.
///
/// One instance is owned per shard (tracking that shard's own chain) on a `ShardParticipant`, and
/// one per shard (tracking each shard's chain) on the `Coordinator`.
pub struct DeadlineTracker {
    oracle: Arc<dyn BlockHeightOracle>,
    deadlines: RwLock<HashMap<String, u64>>,
}

impl DeadlineTracker {
    #[must_use]
    pub fn new(oracle: Arc<dyn BlockHeightOracle>) -> Self {
        Self {
            oracle,
            deadlines: RwLock::new(HashMap::new()),
        }
    }

    /// Records `deadline[tx_id] = current_height() + timeout_blocks`.
    ///
    /// Calling this again for a `tx_id` that already has a recorded deadline overwrites it with
    /// a deadline computed from the *current* height and the new `timeout_blocks` — it is not
    /// idempotent across differing arguments. This mirrors an ambiguity in the reference design
    /// (see `SPEC_FULL.md` §9); re-`Prepare`s in practice call this with the same
    /// `timeout_blocks` each time, at which point the only observable effect of a repeat call is
    /// advancing the deadline by however many blocks elapsed between calls.
    ///
    /// # Errors
    /// Returns [`ChainError::RpcUnavailable`] if the height query fails.
    pub async fn start(&self, tx_id: &str, timeout_blocks: u64) -> Result<u64, ChainError> {
        let height = self.oracle.current_height().await?;
        let deadline = height.saturating_add(timeout_blocks);
        self.deadlines
            .write()
            .expect("deadline map lock poisoned")
            .insert(tx_id.to_string(), deadline);
        Ok(deadline)
    }

    /// Records a deadline for `tx_id` only if one is not already present, leaving an existing
    /// deadline untouched. `ShardParticipant::Prepare` uses this so repeated `Prepare`s for the
    /// same transaction don't re-derive the deadline from a later block height.
    ///
    /// # Errors
    /// Returns [`ChainError::RpcUnavailable`] if the height query fails.
    pub async fn start_if_absent(&self, tx_id: &str, timeout_blocks: u64) -> Result<u64, ChainError> {
        if let Some(existing) = self.deadline_of(tx_id) {
            return Ok(existing);
        }
        self.start(tx_id, timeout_blocks).await
    }

    /// Returns whether `tx_id` has passed its recorded deadline, strictly: a query at exactly the
    /// deadline block returns `false`. This matches the on-chain escrow's `commit` precondition
    /// of `block.number <= deadline`.
    ///
    /// # Errors
    /// Returns [`ChainError::UnknownTransaction`] if no deadline has been recorded for `tx_id`,
    /// or [`ChainError::RpcUnavailable`] if the height query fails.
    pub async fn is_expired(&self, tx_id: &str) -> Result<bool, ChainError> {
        let deadline = self.deadline_of(tx_id).ok_or(ChainError::UnknownTransaction)?;
        let height = self.oracle.current_height().await?;
        Ok(height > deadline)
    }

    /// Read-only accessor; does not query the oracle.
    #[must_use]
    pub fn deadline_of(&self, tx_id: &str) -> Option<u64> {
        self.deadlines
            .read()
            .expect("deadline map lock poisoned")
            .get(tx_id)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::DeadlineTracker;
    use crate::oracle::test_utils::MockOracle;

    #[tokio::test]
    async fn start_records_height_plus_timeout() {
        let oracle = Arc::new(MockOracle::at(100));
        let tracker = DeadlineTracker::new(oracle);
        let deadline = tracker.start("tx1", 50).await.unwrap();
        assert_eq!(deadline, 150);
        assert_eq!(tracker.deadline_of("tx1"), Some(150));
    }

    #[tokio::test]
    async fn is_expired_is_strict_at_the_boundary() {
        let oracle = Arc::new(MockOracle::at(100));
        let tracker = DeadlineTracker::new(oracle.clone());
        tracker.start("tx1", 10).await.unwrap(); // deadline = 110

        oracle.set(110);
        assert!(!tracker.is_expired("tx1").await.unwrap());

        oracle.set(111);
        assert!(tracker.is_expired("tx1").await.unwrap());
    }

    #[tokio::test]
    async fn is_expired_on_unknown_tx_errors() {
        let oracle = Arc::new(MockOracle::at(100));
        let tracker = DeadlineTracker::new(oracle);
        let err = tracker.is_expired("nope").await.unwrap_err();
        assert!(matches!(err, crate::error::ChainError::UnknownTransaction));
    }

    #[tokio::test]
    async fn start_if_absent_preserves_existing_deadline() {
        let oracle = Arc::new(MockOracle::at(100));
        let tracker = DeadlineTracker::new(oracle.clone());
        tracker.start("tx1", 10).await.unwrap(); // deadline = 110

        oracle.set(200);
        let deadline = tracker.start_if_absent("tx1", 10).await.unwrap();
        assert_eq!(deadline, 110);
    }

    #[tokio::test]
    async fn re_start_overwrites_with_new_deadline() {
        let oracle = Arc::new(MockOracle::at(100));
        let tracker = DeadlineTracker::new(oracle.clone());
        tracker.start("tx1", 10).await.unwrap(); // deadline = 110

        oracle.set(200);
        let deadline = tracker.start("tx1", 10).await.unwrap();
        assert_eq!(deadline, 210);
    }
}
