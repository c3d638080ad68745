//! Pylon sidecar entrypoint: wires settings, a main/archive chain client
//! pair, the metagraph cache, the weight store, and the periodic background
//! tasks into one `axum` server.

use std::sync::Arc;

use pylon::cache::MetagraphCache;
use pylon::chain::adapter::ChainClient;
use pylon::chain::archive::ArchiveFallbackClient;
use pylon::chain::subxt_client::{SubxtChainClient, SubxtClientConfig};
use pylon::config::Settings;
use pylon::domain::Hotkey;
use pylon::http::{self, AppState};
use pylon::jobs::{hyperparams_refresh_task, metagraph_refresh_task, CommitRevealScheduler, StopSignal};
use pylon::logging::{init_logging, LoggingConfig};
use pylon::store::InMemoryWeightStore;
use pylon::wallet::Wallet;

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(&LoggingConfig::from_env());

    let settings = Settings::from_env()?;
    info!(
        netuid = settings.bittensor_netuid,
        network = %settings.bittensor_network,
        "starting pylon"
    );

    let wallet_path = settings.bittensor_wallet_path.to_str().map(str::to_string);
    let main_config = SubxtClientConfig {
        rpc_url: settings.network_endpoint(),
        wallet_name: settings.bittensor_wallet_name.clone(),
        hotkey_name: settings.bittensor_wallet_hotkey_name.clone(),
        wallet_path: wallet_path.clone(),
    };
    let archive_config = SubxtClientConfig {
        rpc_url: settings.archive_network_endpoint(),
        wallet_name: settings.bittensor_wallet_name.clone(),
        hotkey_name: settings.bittensor_wallet_hotkey_name.clone(),
        wallet_path: wallet_path,
    };

    let main_client = Arc::new(SubxtChainClient::new(main_config));
    let archive_client = Arc::new(SubxtChainClient::new(archive_config));
    main_client.open().await?;
    archive_client.open().await?;

    let client: Arc<dyn ChainClient> = Arc::new(ArchiveFallbackClient::new(
        main_client,
        archive_client,
        settings.bittensor_archive_blocks_cutoff,
    ));

    let wallet = Wallet::new(
        &settings.bittensor_wallet_name,
        &settings.bittensor_wallet_hotkey_name,
        settings.bittensor_wallet_path.to_str(),
    )?;
    let hotkey = Hotkey::from(wallet.hotkey_keypair(None)?.ss58_address());

    let cache = Arc::new(MetagraphCache::new(
        settings.metagraph_cache_ttl,
        settings.metagraph_cache_maxsize,
    ));
    let store: pylon::store::SharedWeightStore = Arc::new(InMemoryWeightStore::new());

    let stop = StopSignal::new();
    let netuid = settings.bittensor_netuid;

    tokio::spawn(metagraph_refresh_task(client.clone(), cache.clone(), netuid, stop.clone()));
    tokio::spawn(hyperparams_refresh_task(client.clone(), netuid, stop.clone()));

    let scheduler = Arc::new(CommitRevealScheduler::new(
        client.clone(),
        netuid,
        settings.commit_cycle_length,
        settings.commit_window_start_offset,
        settings.commit_window_end_buffer,
    ));
    tokio::spawn(scheduler.task(stop.clone()));

    let state = Arc::new(AppState {
        client,
        cache,
        store,
        netuid,
        hotkey,
        identities: settings.identities.clone(),
        weights_retry_attempts: settings.weights_retry_attempts,
        weights_retry_delay: std::time::Duration::from_secs(settings.weights_retry_delay_seconds),
    });

    let router = http::router(state);
    let listener = tokio::net::TcpListener::bind(&settings.http_bind_addr).await?;
    info!(addr = %settings.http_bind_addr, "listening");
    axum::serve(listener, router).await?;

    stop.stop();
    Ok(())
}
