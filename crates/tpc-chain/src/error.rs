/// Which on-chain state transition a failure occurred during.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnChainOp {
    Lock,
    Commit,
    Reclaim,
}

impl OnChainOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lock => "lock",
            Self::Commit => "commit",
            Self::Reclaim => "reclaim",
        }
    }
}

/// The error taxonomy shared by the escrow driver and the deadline tracker.
///
/// `ShardService`/`CoordinatorService` RPC handlers map each variant to a `tonic::Status`; see
/// `tpc-shard`/`tpc-coordinator`.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    /// Transport failure talking to a shard's chain endpoint.
    #[error("rpc endpoint unavailable: {0}")]
    RpcUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A `DeadlineTracker` query for a transaction id it has never `start`ed.
    #[error("no deadline recorded for transaction")]
    UnknownTransaction,

    /// A transaction mined with a failure status.
    #[error("{op} reverted on-chain", op = op.as_str())]
    OnChainReverted {
        op: OnChainOp,
        tx_hash: Option<ethers::types::H256>,
    },

    /// A revert that is expected given the escrow's preconditions (e.g. past the deadline).
    #[error("failed precondition: {reason}")]
    FailedPrecondition { reason: &'static str },

    /// Any other unexpected failure building or signing a transaction.
    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ChainError {
    pub fn rpc_unavailable<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RpcUnavailable(Box::new(source))
    }

    pub fn internal<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Internal(Box::new(source))
    }
}
