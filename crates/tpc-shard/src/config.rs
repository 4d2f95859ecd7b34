use std::collections::HashMap;

use ethers::types::Address;
use serde::{
    Deserialize,
    Serialize,
};

/// The single config for one shard process.
///
/// The shard's identity and gRPC bind port are not here: they come from the `--id`/`--port`
/// command-line arguments, since a single config image is shared by every shard in a deployment
/// and only the CLI distinguishes one shard process from another.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// JSON object mapping shard id to that shard's blockchain RPC endpoint, e.g.
    /// `{"shard1":"http://localhost:8545","shard2":"http://localhost:8546"}`.
    pub shard_rpcs: String,
    /// JSON object mapping shard id to that shard's escrow adapter contract address.
    pub adapters: String,
    pub log: String,
    /// Forces writing trace data to stdout no matter if connected to a tty or not.
    pub force_stdout: bool,
    /// Set to true to disable the metrics server.
    pub no_metrics: bool,
    /// The endpoint which will be listened on for serving prometheus metrics.
    pub metrics_http_listener_addr: String,
}

impl tpc_config::Config for Config {
    const PREFIX: &'static str = "TPC_SHARD_";
}

impl Config {
    /// Looks up this shard's blockchain RPC endpoint out of the `shard_rpcs` map.
    ///
    /// # Errors
    /// Returns an error if `shard_rpcs` is not valid JSON or has no entry for `shard_id`.
    pub fn rpc_url_for(&self, shard_id: &str) -> eyre::Result<String> {
        lookup(&self.shard_rpcs, shard_id, "shard_rpcs")
    }

    /// Looks up and parses this shard's escrow adapter address out of the `adapters` map.
    ///
    /// # Errors
    /// Returns an error if `adapters` is not valid JSON, has no entry for `shard_id`, or the
    /// entry is not a well-formed address.
    pub fn adapter_address_for(&self, shard_id: &str) -> eyre::Result<Address> {
        let raw = lookup(&self.adapters, shard_id, "adapters")?;
        raw.parse().map_err(|_| eyre::eyre!("`{raw}` is not a valid address (shard `{shard_id}`)"))
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
    fn rpc_url_for_looks_up_shard() {
        let cfg = Config {
            shard_rpcs: r#"{"shard1":"http://localhost:8545"}"#.to_string(),
            adapters: r#"{"shard1":"0x24c881bF947a922cfb46794DEC370036d413b4B2"}"#.to_string(),
            log: "info".to_string(),
            force_stdout: false,
            no_metrics: true,
            metrics_http_listener_addr: "127.0.0.1:9000".to_string(),
        };
        assert_eq!(cfg.rpc_url_for("shard1").unwrap(), "http://localhost:8545");
        assert!(cfg.adapter_address_for("shard1").is_ok());
        assert!(cfg.rpc_url_for("shard2").is_err());
    }
}
