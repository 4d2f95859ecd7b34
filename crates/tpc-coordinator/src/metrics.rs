use metrics::{
    counter,
    describe_counter,
    Counter,
};

const PREPARE_COUNT: &str = "tpc_coordinator_prepare_count";
const PREPARE_SYNTHETIC_ABORT_COUNT: &str = "tpc_coordinator_prepare_synthetic_abort_count";
const COMMIT_COUNT: &str = "tpc_coordinator_commit_count";
const ABORT_COUNT: &str = "tpc_coordinator_abort_count";
const LOCK_ON_CHAIN_FAILURE_COUNT: &str = "tpc_coordinator_lock_on_chain_failure_count";
const OFF_CHAIN_COMMIT_FAILURE_COUNT: &str = "tpc_coordinator_off_chain_commit_failure_count";
const COMMIT_ON_CHAIN_FAILURE_COUNT: &str = "tpc_coordinator_commit_on_chain_failure_count";
const OFF_CHAIN_ABORT_FAILURE_COUNT: &str = "tpc_coordinator_off_chain_abort_failure_count";
const RECLAIM_ON_CHAIN_FAILURE_COUNT: &str = "tpc_coordinator_reclaim_on_chain_failure_count";

pub struct Metrics {
    pub prepare_count: Counter,
    pub prepare_synthetic_abort_count: Counter,
    pub commit_count: Counter,
    pub abort_count: Counter,
    pub lock_on_chain_failure_count: Counter,
    pub off_chain_commit_failure_count: Counter,
    pub commit_on_chain_failure_count: Counter,
    pub off_chain_abort_failure_count: Counter,
    pub reclaim_on_chain_failure_count: Counter,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        describe_counter!(PREPARE_COUNT, "the number of Prepare calls served");
        describe_counter!(
            PREPARE_SYNTHETIC_ABORT_COUNT,
            "the number of per-shard ABORT votes synthesized from a transport failure during Prepare"
        );
        describe_counter!(COMMIT_COUNT, "the number of Commit calls served");
        describe_counter!(ABORT_COUNT, "the number of Abort calls served");
        describe_counter!(
            LOCK_ON_CHAIN_FAILURE_COUNT,
            "the number of per-shard LockOnChain calls that failed during Commit's lock sub-phase"
        );
        describe_counter!(
            OFF_CHAIN_COMMIT_FAILURE_COUNT,
            "the number of per-shard off-chain Commit calls that failed during Commit's off-chain sub-phase"
        );
        describe_counter!(
            COMMIT_ON_CHAIN_FAILURE_COUNT,
            "the number of per-shard CommitOnChain calls that failed during Commit's finalize sub-phase"
        );
        describe_counter!(
            OFF_CHAIN_ABORT_FAILURE_COUNT,
            "the number of per-shard off-chain Abort calls that failed during Abort's off-chain sub-phase"
        );
        describe_counter!(
            RECLAIM_ON_CHAIN_FAILURE_COUNT,
            "the number of per-shard ReclaimOnChain calls that failed during Abort's on-chain sub-phase"
        );

        Self {
            prepare_count: counter!(PREPARE_COUNT),
            prepare_synthetic_abort_count: counter!(PREPARE_SYNTHETIC_ABORT_COUNT),
            commit_count: counter!(COMMIT_COUNT),
            abort_count: counter!(ABORT_COUNT),
            lock_on_chain_failure_count: counter!(LOCK_ON_CHAIN_FAILURE_COUNT),
            off_chain_commit_failure_count: counter!(OFF_CHAIN_COMMIT_FAILURE_COUNT),
            commit_on_chain_failure_count: counter!(COMMIT_ON_CHAIN_FAILURE_COUNT),
            off_chain_abort_failure_count: counter!(OFF_CHAIN_ABORT_FAILURE_COUNT),
            reclaim_on_chain_failure_count: counter!(RECLAIM_ON_CHAIN_FAILURE_COUNT),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
