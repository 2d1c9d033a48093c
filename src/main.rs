// Daemon entry point: one instance per simulated router

use log::info;
use std::sync::Arc;

use linkstate_router::config::Config;
use linkstate_router::error::{AppError, Result};
use linkstate_router::{init, interfaces, packet_loop, tasks, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    init::init_logging();

    let config = Config::from_env()?;
    let inventory = interfaces::list_interfaces();
    info!(
        "[{}] starting on port {} with {} interface(s)",
        config.router_id,
        config.port,
        inventory.len()
    );
    for iface in &inventory {
        match iface.broadcast {
            Some(broadcast) => info!(
                "[{}] inter-router interface {} (broadcast {})",
                config.router_id, iface.address, broadcast
            ),
            None => info!("[{}] host subnet {}", config.router_id, iface.address),
        }
    }

    let state = Arc::new(AppState::new(config, inventory));
    let socket = init::init_socket(state.port()).await?;

    let receiver = tokio::spawn(packet_loop::main_loop(Arc::clone(&socket), Arc::clone(&state)));
    tasks::spawn_hello_task(socket, state);

    // The receiver runs for the life of the process; it only returns on a
    // fatal configuration error.
    receiver
        .await
        .map_err(|e| AppError::Network(format!("receiver task failed: {}", e)))?
}
