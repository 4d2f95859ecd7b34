use std::{
    net::SocketAddr,
    process::ExitCode,
    str::FromStr,
    sync::Arc,
};

use clap::Parser;
use ethers::signers::LocalWallet;
use eyre::WrapErr as _;
use tonic::transport::Server;
use tpc_chain::{
    DeadlineTracker,
    EthersBlockHeightOracle,
    EscrowAdapter,
};
use tpc_shard::{
    service::Shard,
    Config,
};
use tpc_wire::shard_service_server::ShardServiceServer;
use tracing::{
    error,
    info,
};

/// One shard node: `--id` selects which entry of the shared config's `shard_rpcs`/`adapters`
/// maps this process drives, `--port` selects the local gRPC bind port.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    id: String,
    #[arg(long)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    tpc_eyre::install().expect("eyre hook must be the first hook installed");

    let args = Args::parse();

    let cfg: Config = match tpc_config::get() {
        Ok(cfg) => cfg,
        Err(error) => {
            eprintln!("failed to read configuration: {error}");
            return ExitCode::FAILURE;
        }
    };

    if tpc_telemetry::configure()
        .set_filter_directives(&cfg.log)
        .set_force_stdout(cfg.force_stdout)
        .try_init()
        .is_err()
    {
        eprintln!("failed to install tracing subscriber");
        return ExitCode::FAILURE;
    }

    if !cfg.no_metrics {
        if let Ok(addr) = cfg.metrics_http_listener_addr.parse::<SocketAddr>() {
            if let Err(error) = metrics_exporter_prometheus::PrometheusBuilder::new()
                .with_http_listener(addr)
                .install()
            {
                error!(%error, "failed to install prometheus metrics exporter");
            }
        } else {
            error!(addr = %cfg.metrics_http_listener_addr, "invalid metrics_http_listener_addr, metrics disabled");
        }
    }

    info!(shard_id = %args.id, port = args.port, config = tpc_telemetry::json(&cfg), "starting shard");

    if let Err(error) = run(args, cfg).await {
        error!(error = format!("{error:?}"), "shard exited with an error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(args: Args, cfg: Config) -> eyre::Result<()> {
    let rpc_url = cfg
        .rpc_url_for(&args.id)
        .wrap_err("failed to resolve shard rpc endpoint")?;
    let adapter_address = cfg
        .adapter_address_for(&args.id)
        .wrap_err("failed to resolve escrow adapter address")?;
    let signing_key = load_signing_key(&args.id).wrap_err("failed to load signing key")?;

    let oracle = EthersBlockHeightOracle::connect(&rpc_url)
        .await
        .wrap_err("failed to connect block height oracle")?;
    let deadlines = DeadlineTracker::new(Arc::new(oracle));

    let escrow = EscrowAdapter::connect(&rpc_url, adapter_address, signing_key)
        .await
        .wrap_err("failed to connect escrow adapter")?;

    let shard = Shard::new(args.id.clone(), deadlines, escrow);

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    let shard_service = ShardServiceServer::new(shard);
    health_reporter
        .set_serving::<ShardServiceServer<Shard>>()
        .await;

    let addr: SocketAddr = format!("[::]:{}", args.port)
        .parse()
        .wrap_err("invalid --port")?;

    info!(%addr, shard_id = %args.id, "listening");
    Server::builder()
        .add_service(health_service)
        .add_service(shard_service)
        .serve(addr)
        .await
        .wrap_err("shard grpc server failed")
}

/// Reads the shard's signing key from `<SHARD_ID>_KEY` (shard id upper-cased), a hex-encoded
/// secp256k1 private key.
fn load_signing_key(shard_id: &str) -> eyre::Result<LocalWallet> {
    let var = format!("{}_KEY", shard_id.to_uppercase());
    let hex = std::env::var(&var).wrap_err_with(|| format!("missing {var} in environment"))?;
    LocalWallet::from_str(hex.trim()).wrap_err("signing key is not a valid private key")
}
