use std::{
    sync::Arc,
    time::Duration,
};

use ethers::{
    types::Address,
    utils::to_checksum,
};
use tokio::{
    sync::mpsc,
    task::JoinSet,
};
use tokio_stream::wrappers::ReceiverStream;
use tonic::{
    Request,
    Response,
    Status,
};
use tpc_wire::{
    coordinator_service_server::CoordinatorService,
    AbortRequest,
    CommitRequest,
    Empty,
    LockRequest,
    OnChainRequest,
    PrepareRequest,
    PrepareResponse,
    VoteStatus,
};

use crate::{
    meta::{
        TxMetaStore,
        TxOnChainMeta,
    },
    metrics::Metrics,
    registry::ShardRegistry,
};

/// The off-chain fan-out timeout `Commit`'s and `Abort`'s off-chain sub-phases use per shard.
/// Not a protocol decision, a liveness bound so one unresponsive shard cannot hang the whole
/// sequence; the on-chain deadline mechanism is what actually recovers a stuck transaction.
const OFF_CHAIN_CALL_TIMEOUT: Duration = Duration::from_secs(1);

/// Fans a transaction out across every configured shard, drives each side of the protocol's
/// sub-phases in the order the protocol requires, and never interprets a shard's vote itself
/// (that decision belongs to whoever calls `Commit`/`Abort` after watching `Prepare`'s votes).
pub struct Coordinator {
    registry: ShardRegistry,
    tx_meta: TxMetaStore,
    default_timeout_blocks: u64,
    metrics: Metrics,
}

impl Coordinator {
    #[must_use]
    pub fn new(registry: ShardRegistry, default_timeout_blocks: u64) -> Self {
        Self {
            registry,
            tx_meta: TxMetaStore::new(),
            default_timeout_blocks,
            metrics: Metrics::new(),
        }
    }
}

#[async_trait::async_trait]
impl CoordinatorService for Coordinator {
    type PrepareStream = ReceiverStream<Result<PrepareResponse, Status>>;

    async fn prepare(
        &self,
        request: Request<PrepareRequest>,
    ) -> Result<Response<Self::PrepareStream>, Status> {
        let request = request.into_inner();
        let tx_id = request.transaction_id.clone();
        self.metrics.prepare_count.increment(1);

        let timeout_blocks = if request.timeout_blocks > 0 {
            request.timeout_blocks as u64
        } else {
            self.default_timeout_blocks
        };

        let recipient: Address = request
            .onchain_recipient
            .parse()
            .map_err(|_| Status::invalid_argument("onchain_recipient is not a valid address"))?;
        self.tx_meta.record(
            &tx_id,
            TxOnChainMeta {
                recipient,
                amount: request.onchain_amount,
            },
        );

        let mut workers = JoinSet::new();
        for shard in self.registry.iter() {
            let shard = Arc::clone(shard);
            let request = request.clone();
            let tx_id = tx_id.clone();
            workers.spawn(async move {
                if let Err(error) = shard.deadlines().start(&tx_id, timeout_blocks).await {
                    tracing::error!(shard = shard.id(), tx_id, %error, "failed to record deadline, voting ABORT");
                    return (
                        PrepareResponse {
                            status: VoteStatus::Abort as i32,
                            shard_id: shard.id().to_string(),
                        },
                        true,
                    );
                }

                let mut client = shard.client().await;
                match client.prepare(request).await {
                    Ok(response) => (response.into_inner(), false),
                    Err(status) => {
                        tracing::warn!(shard = shard.id(), tx_id, %status, "transport failure during Prepare, synthesizing ABORT");
                        (
                            PrepareResponse {
                                status: VoteStatus::Abort as i32,
                                shard_id: shard.id().to_string(),
                            },
                            true,
                        )
                    }
                }
            });
        }

        // Every worker is joined before any vote is streamed back: the reference coordinator
        // fans Prepare out to threads and joins all of them before yielding votes, so a
        // server-streaming wire shape here does not imply votes trickle in as they arrive.
        let mut votes = Vec::with_capacity(self.registry.len());
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((vote, synthetic)) => {
                    if synthetic {
                        self.metrics.prepare_synthetic_abort_count.increment(1);
                    }
                    votes.push(vote);
                }
                Err(join_error) => {
                    tracing::error!(%join_error, tx_id, "prepare worker task panicked");
                }
            }
        }

        let (tx, rx) = mpsc::channel(votes.len().max(1));
        for vote in votes {
            // The receiver is held by the response we are about to return; a send error here
            // would mean the client already dropped the stream, which is not this call's
            // problem to report.
            let _ = tx.send(Ok(vote)).await;
        }
        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn commit(&self, request: Request<CommitRequest>) -> Result<Response<Empty>, Status> {
        let tx_id = request.into_inner().transaction_id;
        let meta = self.tx_meta.get(&tx_id).ok_or_else(|| {
            Status::failed_precondition(
                "no on-chain metadata recorded for transaction (Prepare was not called, or this \
                 transaction was already finalized)",
            )
        })?;
        self.metrics.commit_count.increment(1);

        // (a) On-chain lock per shard, using that shard's own recorded deadline. Individual
        // failures are logged but do not halt the sequence.
        let recipient = to_checksum(&meta.recipient, None);
        let mut lockers = JoinSet::new();
        for shard in self.registry.iter() {
            let shard = Arc::clone(shard);
            let tx_id = tx_id.clone();
            let recipient = recipient.clone();
            lockers.spawn(async move {
                let Some(deadline) = shard.deadlines().deadline_of(&tx_id) else {
                    tracing::error!(shard = shard.id(), tx_id, "commit: no deadline recorded for shard, skipping lock");
                    return false;
                };
                let request = LockRequest {
                    transaction_id: tx_id.clone(),
                    recipient,
                    amount: meta.amount,
                    deadline,
                };
                let mut client = shard.client().await;
                match client.lock_on_chain(request).await {
                    Ok(response) => {
                        tracing::info!(shard = shard.id(), tx_id, hash = %response.into_inner().hash, "locked on-chain");
                        true
                    }
                    Err(status) => {
                        tracing::error!(shard = shard.id(), tx_id, %status, "LockOnChain failed");
                        false
                    }
                }
            });
        }
        count_failures(lockers, &self.metrics.lock_on_chain_failure_count).await;

        // (b) Off-chain commit fan-out, bounded by a short per-call timeout. Failures are
        // logged, not propagated: correctness here does not depend on in-band retries.
        let mut committers = JoinSet::new();
        for shard in self.registry.iter() {
            let shard = Arc::clone(shard);
            let tx_id = tx_id.clone();
            committers.spawn(async move {
                let request = CommitRequest {
                    transaction_id: tx_id.clone(),
                };
                let mut client = shard.client().await;
                match tokio::time::timeout(OFF_CHAIN_CALL_TIMEOUT, client.commit(request)).await {
                    Ok(Ok(_)) => true,
                    Ok(Err(status)) => {
                        tracing::warn!(shard = shard.id(), tx_id, %status, "off-chain Commit failed");
                        false
                    }
                    Err(_) => {
                        tracing::warn!(shard = shard.id(), tx_id, "off-chain Commit timed out");
                        false
                    }
                }
            });
        }
        count_failures(committers, &self.metrics.off_chain_commit_failure_count).await;

        // (c) On-chain finalize. Failures are logged; the on-chain deadline mechanism is the
        // external recovery path for a shard that missed its CommitOnChain.
        let mut finalizers = JoinSet::new();
        for shard in self.registry.iter() {
            let shard = Arc::clone(shard);
            let tx_id = tx_id.clone();
            finalizers.spawn(async move {
                let request = OnChainRequest {
                    transaction_id: tx_id.clone(),
                };
                let mut client = shard.client().await;
                match client.commit_on_chain(request).await {
                    Ok(response) => {
                        tracing::info!(shard = shard.id(), tx_id, hash = %response.into_inner().hash, "committed on-chain");
                        true
                    }
                    Err(status) => {
                        tracing::error!(shard = shard.id(), tx_id, %status, "CommitOnChain failed");
                        false
                    }
                }
            });
        }
        count_failures(finalizers, &self.metrics.commit_on_chain_failure_count).await;

        self.tx_meta.discard(&tx_id);
        Ok(Response::new(Empty {}))
    }

    async fn abort(&self, request: Request<AbortRequest>) -> Result<Response<Empty>, Status> {
        let tx_id = request.into_inner().transaction_id;
        self.metrics.abort_count.increment(1);

        // (a) Off-chain abort fan-out, same per-call timeout as Commit's off-chain sub-phase.
        let mut aborters = JoinSet::new();
        for shard in self.registry.iter() {
            let shard = Arc::clone(shard);
            let tx_id = tx_id.clone();
            aborters.spawn(async move {
                let request = AbortRequest {
                    transaction_id: tx_id.clone(),
                };
                let mut client = shard.client().await;
                match tokio::time::timeout(OFF_CHAIN_CALL_TIMEOUT, client.abort(request)).await {
                    Ok(Ok(_)) => true,
                    Ok(Err(status)) => {
                        tracing::warn!(shard = shard.id(), tx_id, %status, "off-chain Abort failed");
                        false
                    }
                    Err(_) => {
                        tracing::warn!(shard = shard.id(), tx_id, "off-chain Abort timed out");
                        false
                    }
                }
            });
        }
        count_failures(aborters, &self.metrics.off_chain_abort_failure_count).await;

        // (b) ReclaimOnChain on every shard unconditionally, whether or not this transaction was
        // ever locked there: a reclaim on an untouched or not-yet-expired transaction reverts
        // harmlessly on-chain, which the shard reports back as a failed precondition. That is
        // logged and ignored rather than surfaced, since Abort has no record of which shards
        // actually hold a lock to reclaim.
        let mut reclaimers = JoinSet::new();
        for shard in self.registry.iter() {
            let shard = Arc::clone(shard);
            let tx_id = tx_id.clone();
            reclaimers.spawn(async move {
                let request = OnChainRequest {
                    transaction_id: tx_id.clone(),
                };
                let mut client = shard.client().await;
                match client.reclaim_on_chain(request).await {
                    Ok(response) => {
                        tracing::info!(shard = shard.id(), tx_id, hash = %response.into_inner().hash, "reclaimed on-chain");
                        true
                    }
                    Err(status) => {
                        tracing::info!(shard = shard.id(), tx_id, %status, "ReclaimOnChain reverted or failed, ignored");
                        false
                    }
                }
            });
        }
        count_failures(reclaimers, &self.metrics.reclaim_on_chain_failure_count).await;

        self.tx_meta.discard(&tx_id);
        Ok(Response::new(Empty {}))
    }
}

/// Drains `workers`, incrementing `counter` once per task that returned `false` or panicked.
async fn count_failures(mut workers: JoinSet<bool>, counter: &metrics::Counter) {
    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok(true) => {}
            Ok(false) => counter.increment(1),
            Err(join_error) => {
                tracing::error!(%join_error, "fan-out worker task panicked");
                counter.increment(1);
            }
        }
    }
}
