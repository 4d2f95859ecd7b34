use metrics::{
    counter,
    describe_counter,
    Counter,
};

const PREPARE_READY_COUNT: &str = "tpc_shard_prepare_ready_count";
const PREPARE_ABORT_COUNT: &str = "tpc_shard_prepare_abort_count";
const COMMIT_COUNT: &str = "tpc_shard_commit_count";
const ABORT_COUNT: &str = "tpc_shard_abort_count";
const LOCK_ON_CHAIN_COUNT: &str = "tpc_shard_lock_on_chain_count";
const COMMIT_ON_CHAIN_FAILURE_COUNT: &str = "tpc_shard_commit_on_chain_failure_count";
const RECLAIM_ON_CHAIN_FAILURE_COUNT: &str = "tpc_shard_reclaim_on_chain_failure_count";

pub struct Metrics {
    pub prepare_ready_count: Counter,
    pub prepare_abort_count: Counter,
    pub commit_count: Counter,
    pub abort_count: Counter,
    pub lock_on_chain_count: Counter,
    pub commit_on_chain_failure_count: Counter,
    pub reclaim_on_chain_failure_count: Counter,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        describe_counter!(
            PREPARE_READY_COUNT,
            "the number of Prepare calls this shard voted READY on"
        );
        describe_counter!(
            PREPARE_ABORT_COUNT,
            "the number of Prepare calls this shard voted ABORT on"
        );
        describe_counter!(COMMIT_COUNT, "the number of off-chain Commit calls served");
        describe_counter!(ABORT_COUNT, "the number of off-chain Abort/Rollback calls served");
        describe_counter!(LOCK_ON_CHAIN_COUNT, "the number of LockOnChain submissions sent");
        describe_counter!(
            COMMIT_ON_CHAIN_FAILURE_COUNT,
            "the number of CommitOnChain submissions that reverted or failed to send"
        );
        describe_counter!(
            RECLAIM_ON_CHAIN_FAILURE_COUNT,
            "the number of ReclaimOnChain submissions that reverted or failed to send"
        );

        Self {
            prepare_ready_count: counter!(PREPARE_READY_COUNT),
            prepare_abort_count: counter!(PREPARE_ABORT_COUNT),
            commit_count: counter!(COMMIT_COUNT),
            abort_count: counter!(ABORT_COUNT),
            lock_on_chain_count: counter!(LOCK_ON_CHAIN_COUNT),
            commit_on_chain_failure_count: counter!(COMMIT_ON_CHAIN_FAILURE_COUNT),
            reclaim_on_chain_failure_count: counter!(RECLAIM_ON_CHAIN_FAILURE_COUNT),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
