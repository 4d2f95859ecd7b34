use std::sync::Arc;

use ethers::providers::{
    Http,
    Middleware,
    Provider,
};

use crate::error::ChainError;

/// A read-only view of one chain's current block height.
///
/// Implementations must not cache the result across calls: the deadline check needs the freshest
/// height available, and caching longer than the lifetime of a single call would let a
/// transaction appear non-expired (or expired) based on stale data.
#[async_trait::async_trait]
pub trait BlockHeightOracle: Send + Sync {
    /// Returns the latest known block number on this oracle's chain.
    ///
    /// # Errors
    /// Returns [`ChainError::RpcUnavailable`] if the underlying endpoint cannot be reached.
    async fn current_height(&self) -> Result<u64, ChainError>;
}

/// A [`BlockHeightOracle`] backed by a live JSON-RPC endpoint.
pub struct EthersBlockHeightOracle<M> {
    provider: Arc<M>,
}

impl EthersBlockHeightOracle<Provider<Http>> {
    /// Connects to `rpc_url` eagerly, so construction itself can fail with
    /// [`ChainError::RpcUnavailable`] if the endpoint is unreachable.
    ///
    /// # Errors
    /// Returns [`ChainError::RpcUnavailable`] if the endpoint cannot be reached or an initial
    /// height query fails.
    pub async fn connect(rpc_url: &str) -> Result<Self, ChainError> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(ChainError::internal)?;
        let oracle = Self {
            provider: Arc::new(provider),
        };
        // Fail fast at construction time per the component contract, rather than surfacing the
        // first RPC failure only on the first real deadline check.
        oracle.current_height().await?;
        Ok(oracle)
    }
}

#[async_trait::async_trait]
impl<M> BlockHeightOracle for EthersBlockHeightOracle<M>
where
    M: Middleware + Send + Sync,
{
    async fn current_height(&self) -> Result<u64, ChainError> {
        let height = self
            .provider
            .get_block_number()
            .await
            .map_err(ChainError::rpc_unavailable)?;
        Ok(height.as_u64())
    }
}

#[cfg(test)]
pub mod test_utils {
    use std::sync::atomic::{
        AtomicU64,
        Ordering,
    };

    use super::{
        BlockHeightOracle,
        ChainError,
    };

    /// A [`BlockHeightOracle`] whose height is set directly by a test, with no network access.
    pub struct MockOracle {
        height: AtomicU64,
    }

    impl MockOracle {
        #[must_use]
        pub fn at(height: u64) -> Self {
            Self {
                height: AtomicU64::new(height),
            }
        }

        pub fn set(&self, height: u64) {
            self.height.store(height, Ordering::SeqCst);
        }

        pub fn advance(&self, blocks: u64) {
            self.height.fetch_add(blocks, Ordering::SeqCst);
        }
    }

    #[async_trait::async_trait]
    impl BlockHeightOracle for MockOracle {
        async fn current_height(&self) -> Result<u64, ChainError> {
            Ok(self.height.load(Ordering::SeqCst))
        }
    }
}
