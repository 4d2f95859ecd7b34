use std::{
    net::SocketAddr,
    process::ExitCode,
};

use eyre::WrapErr as _;
use tonic::transport::Server;
use tpc_coordinator::{
    service::Coordinator,
    Config,
    ShardRegistry,
};
use tpc_wire::coordinator_service_server::CoordinatorServiceServer;
use tracing::{
    error,
    info,
};

/// The coordinator's gRPC bind address. Unlike a shard, the coordinator takes no CLI arguments:
/// one coordinator process serves every shard named in its config.
const BIND_ADDR: &str = "[::]:50051";

#[tokio::main]
async fn main() -> ExitCode {
    tpc_eyre::install().expect("eyre hook must be the first hook installed");

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

    info!(config = tpc_telemetry::json(&cfg), "starting coordinator");

    if let Err(error) = run(cfg).await {
        error!(error = format!("{error:?}"), "coordinator exited with an error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn run(cfg: Config) -> eyre::Result<()> {
    let default_timeout_blocks = cfg.default_timeout_blocks;
    let registry = ShardRegistry::connect(&cfg)
        .await
        .wrap_err("failed to connect to configured shards")?;
    info!(shard_count = registry.len(), "connected to shards");

    let coordinator = Coordinator::new(registry, default_timeout_blocks);

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    let coordinator_service = CoordinatorServiceServer::new(coordinator);
    health_reporter
        .set_serving::<CoordinatorServiceServer<Coordinator>>()
        .await;

    let addr: SocketAddr = BIND_ADDR.parse().wrap_err("invalid bind address")?;
    info!(%addr, "listening");
    Server::builder()
        .add_service(health_service)
        .add_service(coordinator_service)
        .serve(addr)
        .await
        .wrap_err("coordinator grpc server failed")
}
