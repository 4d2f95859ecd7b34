use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

/// The single config for the coordinator process. Unlike a shard, the coordinator binds no
/// `--port`/`--id` arguments: it accepts no CLI arguments at all and always binds `:50051`.
///
/// The coordinator never signs on-chain transactions itself (that is the shard's job, driven by
/// its own `EscrowAdapter` behind `LockOnChain`/`CommitOnChain`/`ReclaimOnChain`), so it has no
/// `adapters` map of contract addresses; it only needs each shard's gRPC address and its own
/// read-only view of each shard's chain height to keep an independent `DeadlineTracker`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON object mapping shard id to that shard's `ShardService` gRPC address.
    pub shards: String,
    /// JSON object mapping shard id to that shard's blockchain RPC endpoint. The coordinator
    /// connects its own read-only [`tpc_chain::BlockHeightOracle`] per shard from this map, so
    /// its `DeadlineTracker` instances are independent of the shard process's own.
    pub shard_rpcs: String,
    /// Used to resolve a `Prepare`'s deadline when the caller passes `timeout_blocks <= 0`.
    pub default_timeout_blocks: u64,
    pub log: String,
    /// Forces writing trace data to stdout no matter if connected to a tty or not.
    pub force_stdout: bool,
    /// Set to true to disable the metrics server.
    pub no_metrics: bool,
    /// The endpoint which will be listened on for serving prometheus metrics.
    pub metrics_http_listener_addr: String,
}

impl tpc_config::Config for Config {
    const PREFIX: &'static str = "TPC_COORDINATOR_";
}

impl Config {
    /// Parses the `shards` map into shard id -> gRPC address pairs.
    ///
    /// # Errors
    /// Returns an error if `shards` is not valid JSON.
    pub fn shard_addresses(&self) -> eyre::Result<HashMap<String, String>> {
        serde_json::from_str(&self.shards)
            .map_err(|e| eyre::eyre!("`shards` is not valid JSON: {e}"))
    }

    /// Looks up a shard's blockchain RPC endpoint out of the `shard_rpcs` map.
    ///
    /// # Errors
    /// Returns an error if `shard_rpcs` is not valid JSON or has no entry for `shard_id`.
    pub fn rpc_url_for(&self, shard_id: &str) -> eyre::Result<String> {
        lookup(&self.shard_rpcs, shard_id, "shard_rpcs")
    }
}

fn lookup(json: &str, shard_id: &str, field: &str) -> eyre::Result<String> {
    let map: HashMap<String, String> =
        serde_json::from_str(json).map_err(|e| eyre::eyre!("`{field}` is not valid JSON: {e}"))?;
    map.get(shard_id)
        .cloned()
        .ok_or_else(|| eyre::eyre!("no `{field}` entry for shard `{shard_id}`"))
}

#[cfg(test)]
mod tests {
    use super::Config;

    const EXAMPLE_ENV: &str = include_str!("../local.env.example");

    #[test]
    fn example_env_config_is_up_to_date() {
        tpc_config::tests::example_env_config_is_up_to_date::<Config>(EXAMPLE_ENV);
    }

    #[test]
    fn config_rejects_unknown_var() {
        tpc_config::tests::config_rejects_unknown_var::<Config>(EXAMPLE_ENV);
    }

    #[test]
    fn shard_addresses_parses_the_map() {
        let cfg = Config {
            shards: r#"{"shard1":"127.0.0.1:50061"}"#.to_string(),
            shard_rpcs: r#"{"shard1":"http://localhost:8545"}"#.to_string(),
            default_timeout_blocks: 64,
            log: "info".to_string(),
            force_stdout: false,
            no_metrics: true,
            metrics_http_listener_addr: "127.0.0.1:9001".to_string(),
        };
        let addrs = cfg.shard_addresses().unwrap();
        assert_eq!(addrs.get("shard1").map(String::as_str), Some("127.0.0.1:50061"));
        assert_eq!(cfg.rpc_url_for("shard1").unwrap(), "http://localhost:8545");
        assert!(cfg.rpc_url_for("shard2").is_err());
    }
}
