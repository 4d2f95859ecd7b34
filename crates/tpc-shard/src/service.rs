use ethers::types::Address;
use tonic::{
    Request,
    Response,
    Status,
};
use tpc_chain::{
    ChainError,
    DeadlineTracker,
    EscrowAdapter,
};
use tpc_wire::{
    shard_service_server::ShardService,
    AbortRequest,
    CommitRequest,
    Empty,
    LockRequest,
    OnChainRequest,
    PrepareRequest,
    PrepareResponse,
    RollbackRequest,
    TxHash,
    VoteStatus,
};

use crate::{
    metrics::Metrics,
    state::{
        ShardState,
        StagingArea,
    },
};

/// One shard: the off-chain 2PC participant state plus the signed driver for this shard's own
/// escrow contract.
pub struct Shard {
    id: String,
    state: ShardState,
    staging: StagingArea,
    deadlines: DeadlineTracker,
    escrow: EscrowAdapter,
    metrics: Metrics,
}

impl Shard {
    #[must_use]
    pub fn new(id: String, deadlines: DeadlineTracker, escrow: EscrowAdapter) -> Self {
        Self {
            id,
            state: ShardState::new(),
            staging: StagingArea::new(),
            deadlines,
            escrow,
            metrics: Metrics::new(),
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn state(&self) -> &ShardState {
        &self.state
    }
}

#[async_trait::async_trait]
impl ShardService for Shard {
    async fn prepare(
        &self,
        request: Request<PrepareRequest>,
    ) -> Result<Response<PrepareResponse>, Status> {
        let request = request.into_inner();
        let tx_id = request.transaction_id;

        let timeout_blocks = u64::try_from(request.timeout_blocks.max(0)).unwrap_or(u64::MAX);
        self.deadlines
            .start_if_absent(&tx_id, timeout_blocks)
            .await
            .map_err(chain_error_to_status)?;

        if self
            .deadlines
            .is_expired(&tx_id)
            .await
            .map_err(chain_error_to_status)?
        {
            tracing::info!(shard = %self.id, tx_id, "prepare: deadline already expired, voting ABORT");
            self.metrics.prepare_abort_count.increment(1);
            return Ok(Response::new(PrepareResponse {
                status: VoteStatus::Abort as i32,
                shard_id: self.id.clone(),
            }));
        }

        self.staging.stage(&tx_id, request.operations);
        tracing::info!(shard = %self.id, tx_id, "prepare: staged operations, voting READY");
        self.metrics.prepare_ready_count.increment(1);
        Ok(Response::new(PrepareResponse {
            status: VoteStatus::Ready as i32,
            shard_id: self.id.clone(),
        }))
    }

    async fn commit(&self, request: Request<CommitRequest>) -> Result<Response<Empty>, Status> {
        let tx_id = request.into_inner().transaction_id;
        if let Some(operations) = self.staging.take(&tx_id) {
            self.state.apply(&operations);
            tracing::info!(shard = %self.id, tx_id, "committed staged operations");
        } else {
            tracing::debug!(shard = %self.id, tx_id, "commit: nothing staged, no-op");
        }
        self.metrics.commit_count.increment(1);
        Ok(Response::new(Empty {}))
    }

    async fn abort(&self, request: Request<AbortRequest>) -> Result<Response<Empty>, Status> {
        let tx_id = request.into_inner().transaction_id;
        self.staging.discard(&tx_id);
        tracing::info!(shard = %self.id, tx_id, "aborted, staged operations discarded");
        self.metrics.abort_count.increment(1);
        Ok(Response::new(Empty {}))
    }

    async fn rollback(
        &self,
        request: Request<RollbackRequest>,
    ) -> Result<Response<Empty>, Status> {
        let tx_id = request.into_inner().transaction_id;
        self.staging.discard(&tx_id);
        Ok(Response::new(Empty {}))
    }

    async fn lock_on_chain(
        &self,
        request: Request<LockRequest>,
    ) -> Result<Response<TxHash>, Status> {
        let request = request.into_inner();
        let recipient: Address = request
            .recipient
            .parse()
            .map_err(|_| Status::invalid_argument("recipient is not a valid address"))?;

        let tx_hash = self
            .escrow
            .lock(
                &request.transaction_id,
                recipient,
                request.deadline,
                ethers::types::U256::from(request.amount),
            )
            .await
            .map_err(chain_error_to_status)?;

        self.metrics.lock_on_chain_count.increment(1);
        Ok(Response::new(TxHash {
            hash: format!("{tx_hash:#x}"),
        }))
    }

    async fn commit_on_chain(
        &self,
        request: Request<OnChainRequest>,
    ) -> Result<Response<TxHash>, Status> {
        let tx_id = request.into_inner().transaction_id;
        let tx_hash = self.escrow.commit(&tx_id).await.map_err(|e| {
            self.metrics.commit_on_chain_failure_count.increment(1);
            chain_error_to_status(e)
        })?;
        Ok(Response::new(TxHash {
            hash: format!("{tx_hash:#x}"),
        }))
    }

    async fn reclaim_on_chain(
        &self,
        request: Request<OnChainRequest>,
    ) -> Result<Response<TxHash>, Status> {
        let tx_id = request.into_inner().transaction_id;
        let tx_hash = self.escrow.reclaim(&tx_id).await.map_err(|e| {
            self.metrics.reclaim_on_chain_failure_count.increment(1);
            chain_error_to_status(e)
        })?;
        Ok(Response::new(TxHash {
            hash: format!("{tx_hash:#x}"),
        }))
    }
}

/// Maps the chain driver's error taxonomy onto `tonic::Status` codes per the component's error
/// handling contract: an on-chain revert that is an expected precondition failure (past
/// deadline, not pending) surfaces as `FAILED_PRECONDITION` with a textual reason; anything else
/// unexpected surfaces as `INTERNAL`.
fn chain_error_to_status(err: ChainError) -> Status {
    match err {
        ChainError::RpcUnavailable(e) => Status::unavailable(e.to_string()),
        ChainError::UnknownTransaction => Status::not_found("no deadline recorded for transaction"),
        ChainError::FailedPrecondition {
            reason,
        } => Status::failed_precondition(reason),
        ChainError::OnChainReverted {
            op,
            tx_hash,
        } => Status::failed_precondition(format!(
            "{op} reverted on-chain{tx}",
            op = op.as_str(),
            tx = tx_hash.map(|h| format!(" (tx {h:#x})")).unwrap_or_default()
        )),
        ChainError::Internal(e) => Status::internal(e.to_string()),
    }
}
