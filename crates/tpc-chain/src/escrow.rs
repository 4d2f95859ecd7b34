use std::sync::Arc;

use ethers::{
    contract::abigen,
    middleware::SignerMiddleware,
    providers::{
        Http,
        Middleware,
        Provider,
    },
    signers::{
        LocalWallet,
        Signer,
    },
    types::{
        Address,
        H256,
        U256,
    },
};

use crate::{
    error::{
        ChainError,
        OnChainOp,
    },
    txid::to_onchain_key,
};

/// Upper bound passed as `gas` on a `lock` send. The adapter does not estimate gas per call;
/// `lock`/`commit`/`reclaim` are fixed-shape storage writes on a contract the shard operator
/// controls, so a flat ceiling is adequate and avoids an extra `eth_estimateGas` round trip per
/// send. `lock` additionally moves value into escrow, hence the higher ceiling than
/// `commit`/`reclaim`.
const LOCK_GAS_LIMIT: u64 = 200_000;

/// Upper bound passed as `gas` on a `commit` or `reclaim` send.
const FINALIZE_GAS_LIMIT: u64 = 100_000;

abigen!(
    EscrowAdapter,
    r#"[
        function lock(bytes32 txId, address recipient, uint256 deadline) external payable
        function commit(bytes32 txId) external
        function reclaim(bytes32 txId) external
        function transactions(bytes32 txId) external view returns (address sender, address recipient, uint256 amount, uint256 deadline, uint8 status)
        event Locked(bytes32 indexed txId, address indexed sender, address indexed recipient, uint256 amount, uint256 deadline)
        event Committed(bytes32 indexed txId)
        event Reclaimed(bytes32 indexed txId)
    ]"#,
);

/// Mirrors the escrow contract's on-chain status byte. `statusOf` returns `0` for a transaction
/// id that was never locked, so `None` is a legitimate steady state, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowStatus {
    None,
    Pending,
    Committed,
    Aborted,
}

impl EscrowStatus {
    fn from_u8(value: u8) -> Result<Self, ChainError> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Pending),
            2 => Ok(Self::Committed),
            3 => Ok(Self::Aborted),
            other => Err(ChainError::internal(UnexpectedStatusByte(other))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("escrow contract returned unrecognized status byte {0}")]
struct UnexpectedStatusByte(u8);

type SignedProvider = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Drives one shard's escrow contract: submits `lock`/`commit`/`reclaim` transactions and reads
/// back recorded status. One instance is owned per shard by the process that needs write access
/// to that shard's contract (the shard itself, for `LockOnChain`/`ReclaimOnChain` issued against
/// its own escrow; the coordinator never signs, it only calls `ShardService::*OnChain` which
/// delegates to the shard's own adapter).
pub struct EscrowAdapter {
    contract: escrow_adapter::EscrowAdapter<SignedProvider>,
}

impl EscrowAdapter {
    /// Connects to `rpc_url` and binds `contract_address`, signing outgoing transactions with
    /// `signing_key`.
    ///
    /// # Errors
    /// Returns [`ChainError::Internal`] if the provider or wallet cannot be constructed, or
    /// [`ChainError::RpcUnavailable`] if the chain id cannot be fetched to bind the wallet to it.
    pub async fn connect(
        rpc_url: &str,
        contract_address: Address,
        signing_key: LocalWallet,
    ) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(ChainError::internal)?;
        let chain_id = provider
            .get_chainid()
            .await
            .map_err(ChainError::rpc_unavailable)?;
        let wallet = signing_key.with_chain_id(chain_id.as_u64());
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contract = escrow_adapter::EscrowAdapter::new(contract_address, client);
        Ok(Self {
            contract,
        })
    }

    /// Locks `value_wei` in escrow for `tx_id`, payable to `recipient` if `commit` lands before
    /// block `deadline`, otherwise reclaimable by the caller.
    ///
    /// A revert here (`tx_id` already locked, zero value, or a past deadline) is logged and the
    /// transaction hash is still returned, mirroring the reference driver: locking is a
    /// best-effort step the coordinator fans out to every shard without halting on one shard's
    /// failure, so this call surfaces the revert as data rather than an error.
    ///
    /// # Errors
    /// Returns [`ChainError::RpcUnavailable`] if the transaction cannot be submitted, or
    /// [`ChainError::Internal`] if no receipt is ever produced for it.
    pub async fn lock(
        &self,
        tx_id: &str,
        recipient: Address,
        deadline: u64,
        value_wei: U256,
    ) -> Result<H256, ChainError> {
        let key = to_onchain_key(tx_id).map_err(ChainError::internal)?;
        let call = self
            .contract
            .lock(key, recipient, U256::from(deadline))
            .value(value_wei)
            .gas(LOCK_GAS_LIMIT);
        send_and_log(call, OnChainOp::Lock).await
    }

    /// Releases a locked `tx_id` to its recorded recipient.
    ///
    /// # Errors
    /// Returns [`ChainError::FailedPrecondition`] (reason "past deadline or not pending") if the
    /// contract reverts, or [`ChainError::RpcUnavailable`]/[`ChainError::Internal`] if the
    /// transaction cannot be submitted or confirmed.
    pub async fn commit(&self, tx_id: &str) -> Result<H256, ChainError> {
        let key = to_onchain_key(tx_id).map_err(ChainError::internal)?;
        let call = self.contract.commit(key).gas(FINALIZE_GAS_LIMIT);
        send_and_require_success(call, "past deadline or not pending").await
    }

    /// Returns a locked `tx_id`'s escrowed value to the original caller.
    ///
    /// # Errors
    /// Returns [`ChainError::FailedPrecondition`] (reason "too early or not pending") if the
    /// contract reverts, or [`ChainError::RpcUnavailable`]/[`ChainError::Internal`] if the
    /// transaction cannot be submitted or confirmed.
    pub async fn reclaim(&self, tx_id: &str) -> Result<H256, ChainError> {
        let key = to_onchain_key(tx_id).map_err(ChainError::internal)?;
        let call = self.contract.reclaim(key).gas(FINALIZE_GAS_LIMIT);
        send_and_require_success(call, "too early or not pending").await
    }

    /// Reads the contract's recorded status for `tx_id` without submitting a transaction.
    ///
    /// # Errors
    /// Returns [`ChainError::RpcUnavailable`] if the call cannot be made.
    pub async fn status_of(&self, tx_id: &str) -> Result<EscrowStatus, ChainError> {
        let key = to_onchain_key(tx_id).map_err(ChainError::internal)?;
        let (_, _, _, _, status) = self
            .contract
            .transactions(key)
            .call()
            .await
            .map_err(ChainError::rpc_unavailable)?;
        EscrowStatus::from_u8(status)
    }

    /// Reads the contract's recorded deadline for `tx_id`; `0` if never locked.
    ///
    /// # Errors
    /// Returns [`ChainError::RpcUnavailable`] if the call cannot be made.
    pub async fn deadline_of(&self, tx_id: &str) -> Result<u64, ChainError> {
        let key = to_onchain_key(tx_id).map_err(ChainError::internal)?;
        let (_, _, _, deadline, _) = self
            .contract
            .transactions(key)
            .call()
            .await
            .map_err(ChainError::rpc_unavailable)?;
        Ok(deadline.as_u64())
    }
}

/// Submits `call` and waits for one confirmation. Each send reads the account's transaction
/// count fresh at submission time; the adapter holds no local nonce reservation, so concurrent
/// calls against the same signing key must be serialized by the caller.
async fn send_and_wait<M, D>(
    call: ethers::contract::builders::ContractCall<M, D>,
) -> Result<ethers::types::TransactionReceipt, ChainError>
where
    M: Middleware,
    D: ethers::abi::Detokenize,
{
    let pending = call.send().await.map_err(ChainError::rpc_unavailable)?;
    let tx_hash = pending.tx_hash();
    pending
        .await
        .map_err(ChainError::rpc_unavailable)?
        .ok_or_else(|| {
            ChainError::internal(ReceiptNotFound {
                tx_hash,
            })
        })
}

/// Submits `call`, logs (but does not error on) a reverted receipt, and always returns the
/// transaction hash. Used by `lock`, whose failures are a logged, best-effort fan-out step.
async fn send_and_log<M, D>(
    call: ethers::contract::builders::ContractCall<M, D>,
    op: OnChainOp,
) -> Result<H256, ChainError>
where
    M: Middleware,
    D: ethers::abi::Detokenize,
{
    let receipt = send_and_wait(call).await?;
    if receipt.status.map(|s| s.as_u64()) != Some(1) {
        tracing::error!(op = op.as_str(), tx_hash = %receipt.transaction_hash, "on-chain transaction reverted");
    }
    Ok(receipt.transaction_hash)
}

/// Submits `call` and maps a reverted receipt to [`ChainError::FailedPrecondition`] with
/// `reason`. Used by `commit`/`reclaim`, whose only revert path is an unmet precondition.
async fn send_and_require_success<M, D>(
    call: ethers::contract::builders::ContractCall<M, D>,
    reason: &'static str,
) -> Result<H256, ChainError>
where
    M: Middleware,
    D: ethers::abi::Detokenize,
{
    let receipt = send_and_wait(call).await?;
    if receipt.status.map(|s| s.as_u64()) == Some(1) {
        Ok(receipt.transaction_hash)
    } else {
        Err(ChainError::FailedPrecondition {
            reason,
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("transaction {tx_hash:#x} dropped from the mempool before a receipt was available")]
struct ReceiptNotFound {
    tx_hash: H256,
}
