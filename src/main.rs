// zija_node_rust/src/main.rs
use std::path::PathBuf;
use std::sync::Arc;

use zija_node_rust::api_service::{self, ApiAppState};
use zija_node_rust::blockchain::checkpoints;
use zija_node_rust::config::NodeConfig;
use zija_node_rust::network_selector;
use zija_node_rust::util::uint256_to_hex;

fn io_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, e))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init();

    log::info!("ZIJA Rust Node starting up...");

    // Optional config file path as the first argument; ZIJA_* variables override it.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let node_config = NodeConfig::load(config_path.as_deref()).map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        io_error("config error", e)
    })?;

    // Builds and checks every network profile before anything else runs.
    let selector = network_selector::init();
    let checkpoints = checkpoints::checkpoints();

    let network = node_config.apply(&selector, &checkpoints).map_err(|e| {
        log::error!("Error: {}", e);
        io_error("network selection", e)
    })?;

    let params = selector.params();
    log::info!(
        "Using {} network (magic {}, port {}, genesis {})",
        network,
        hex::encode(params.message_start),
        params.default_port,
        uint256_to_hex(&params.hash_genesis_block)
    );
    log::info!(
        "Checkpoints {} (estimated {} blocks), data directory {}",
        if checkpoints.is_enabled() { "enabled" } else { "disabled" },
        checkpoints.total_blocks_estimate(),
        node_config.network_data_dir(params).display()
    );
    log::debug!("{} DNS seeds, {} fixed seeds", params.dns_seeds.len(), params.fixed_seeds.len());

    // --- Start API Service Task ---
    let listen_addr = node_config.listen_addr().map_err(|e| io_error("config error", e))?;
    let app_state = ApiAppState { selector: Arc::clone(&selector), checkpoints: Arc::clone(&checkpoints) };
    let api_router = api_service::create_router(app_state);
    let api_listener = match tokio::net::TcpListener::bind(listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("Failed to bind API listener to {}: {}", listen_addr, e);
            return Err(e);
        }
    };
    log::info!("API server listening on {}", listen_addr);
    let api_task = tokio::spawn(async move {
        match axum::serve(api_listener, api_router.into_make_service()).await {
            Ok(_) => log::info!("API service stopped normally."),
            Err(e) => log::error!("API service encountered an error: {}", e),
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("Ctrl-C received, ZIJA Rust Node shutting down...");
        }
        res_api = api_task => {
            match res_api {
                Ok(_) => log::info!("API service completed gracefully."),
                Err(e) => log::error!("API service task panicked or was cancelled: {}", e),
            }
        }
    }

    log::info!("ZIJA Rust Node shut down complete.");
    Ok(())
}
