//! # Relay CLI

use crate::{
    config::RelayConfig,
    fees::VerifierAllowList,
    interactor::AlloyInteractor,
    relay::RelayServer,
    rpc::{Relay, RelayApiServer},
};
use alloy::providers::ProviderBuilder;
use clap::Parser;
use http::header;
use jsonrpsee::server::Server;
use std::{net::IpAddr, path::PathBuf, sync::Arc};
use tower::ServiceBuilder;
use tower_http::cors::{AllowMethods, AllowOrigin, CorsLayer};
use tracing::info;
use url::Url;

/// The enveloping relay service executes user-signed meta-transactions paid
/// for in ERC20 tokens instead of native gas.
#[derive(Debug, Parser)]
#[command(author, about = "Enveloping relay", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be stored at this path.
    #[arg(long, value_name = "CONFIG", env = "RELAY_CONFIG", default_value = "relay.yaml")]
    pub config: PathBuf,
    /// The address to serve the RPC on.
    #[arg(long = "http.addr", value_name = "ADDR")]
    pub address: Option<IpAddr>,
    /// The port to serve the RPC on.
    #[arg(long = "http.port", value_name = "PORT")]
    pub port: Option<u16>,
    /// The RPC endpoint of the chain to estimate against.
    ///
    /// Must be a valid HTTP or HTTPS URL pointing to a JSON-RPC endpoint.
    #[arg(long = "endpoint", value_name = "RPC_ENDPOINT")]
    pub endpoint: Option<Url>,
}

impl Args {
    /// Loads the configuration file and applies the CLI overrides.
    pub fn into_config(self) -> eyre::Result<RelayConfig> {
        let mut config = RelayConfig::load(&self.config)?;
        if let Some(address) = self.address {
            config = config.with_address(address);
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(endpoint) = self.endpoint {
            config = config.with_rpc_url(endpoint);
        }
        Ok(config)
    }
}

/// Serves the relay RPC until the process is stopped.
pub async fn run(config: RelayConfig) -> eyre::Result<()> {
    let provider = ProviderBuilder::new().connect_http(config.blockchain.rpc_url.clone());
    let interactor =
        Arc::new(AlloyInteractor::new(provider, config.blockchain.relay_hub));
    let rates = config.rates.source();
    let sponsorship =
        Arc::new(VerifierAllowList::new(config.app.sponsored_verifiers.clone()));

    let server = RelayServer::new(
        config.app.clone(),
        interactor.clone(),
        rates,
        sponsorship,
        config.blockchain.relay_worker,
    );

    // Dispatch (signing, broadcast, persistence) is wired in by the worker
    // deployment; stand-alone the relay serves ping and estimation only.
    let relay = Relay::new(server, interactor, config.blockchain.clone(), None);

    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::any())
        .allow_origin(AllowOrigin::any())
        .allow_headers([header::CONTENT_TYPE]);

    let rpc = Server::builder()
        .set_http_middleware(ServiceBuilder::new().layer(cors))
        .build((config.server.address, config.server.port))
        .await?;
    let addr = rpc.local_addr()?;
    info!(%addr, "relay RPC started");

    let handle = rpc.start(relay.into_rpc());
    handle.stopped().await;

    Ok(())
}
