use std::{
    collections::HashMap,
    sync::Arc,
};

use eyre::WrapErr as _;
use tokio::sync::Mutex;
use tonic::transport::Channel;
use tpc_chain::{
    DeadlineTracker,
    EthersBlockHeightOracle,
};
use tpc_wire::shard_service_client::ShardServiceClient;

use crate::config::Config;

/// A shard's gRPC stub plus the coordinator's own view of that shard's chain height.
///
/// The client is behind a [`Mutex`] because the generated `ShardServiceClient::*` methods take
/// `&mut self`: `tonic::client::Grpc` buffers per-call framing state that is not safe to share
/// across concurrent calls on the same handle. Two different shards' handles are independent, so
/// `Prepare`'s fan-out still runs with full cross-shard parallelism; only same-shard calls
/// serialize behind this lock.
pub struct ShardHandle {
    id: String,
    client: Mutex<ShardServiceClient<Channel>>,
    deadlines: DeadlineTracker,
}

impl ShardHandle {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn deadlines(&self) -> &DeadlineTracker {
        &self.deadlines
    }

    pub async fn client(&self) -> tokio::sync::MutexGuard<'_, ShardServiceClient<Channel>> {
        self.client.lock().await
    }
}

/// Every shard the coordinator fans out to: one gRPC stub and one independent
/// [`DeadlineTracker`] per shard.
pub struct ShardRegistry {
    shards: HashMap<String, Arc<ShardHandle>>,
}

impl ShardRegistry {
    /// Connects to every shard named in `cfg.shards`: a `ShardServiceClient` over its gRPC
    /// address, and a `DeadlineTracker` backed by an `EthersBlockHeightOracle` over its chain RPC
    /// endpoint.
    ///
    /// # Errors
    /// Returns an error if `cfg.shards`/`cfg.shard_rpcs` are malformed, or if any shard's gRPC or
    /// chain endpoint cannot be reached at startup.
    pub async fn connect(cfg: &Config) -> eyre::Result<Self> {
        let addresses = cfg.shard_addresses().wrap_err("failed to parse `shards`")?;
        let mut shards = HashMap::with_capacity(addresses.len());
        for (shard_id, grpc_addr) in addresses {
            let client = ShardServiceClient::connect(format!("http://{grpc_addr}"))
                .await
                .wrap_err_with(|| format!("failed to connect to shard `{shard_id}` at `{grpc_addr}`"))?;

            let rpc_url = cfg
                .rpc_url_for(&shard_id)
                .wrap_err_with(|| format!("failed to resolve chain rpc for shard `{shard_id}`"))?;
            let oracle = EthersBlockHeightOracle::connect(&rpc_url)
                .await
                .wrap_err_with(|| format!("failed to connect block height oracle for shard `{shard_id}`"))?;
            let deadlines = DeadlineTracker::new(Arc::new(oracle));

            shards.insert(
                shard_id.clone(),
                Arc::new(ShardHandle {
                    id: shard_id,
                    client: Mutex::new(client),
                    deadlines,
                }),
            );
        }
        Ok(Self {
            shards,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ShardHandle>> {
        self.shards.values()
    }

    #[must_use]
    pub fn get(&self, shard_id: &str) -> Option<&Arc<ShardHandle>> {
        self.shards.get(shard_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }
}
