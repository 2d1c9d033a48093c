// Kernel route programming via the system `ip` utility

use log::{info, warn};
use std::net::Ipv4Addr;
use tokio::process::Command;

use crate::error::{AppError, Result};
use crate::lsdb::PlannedRoute;

/// Program every planned route. Failures are per-route: the batch
/// continues and the next accepted advertisement retries.
pub async fn install_routes(plan: &[PlannedRoute]) {
    for route in plan {
        if let Err(e) = replace_route(&route.destination, route.gateway).await {
            warn!(
                "failed to install route to {} via {}: {}",
                route.destination, route.gateway, e
            );
        }
    }
}

/// `ip route replace <dest> via <gw>`. Replace semantics keep the call
/// idempotent across recomputations.
async fn replace_route(destination: &str, gateway: Ipv4Addr) -> Result<()> {
    let status = Command::new("ip")
        .args(["route", "replace", destination, "via"])
        .arg(gateway.to_string())
        .status()
        .await
        .map_err(|e| AppError::Route(format!("failed to run ip: {}", e)))?;

    if !status.success() {
        return Err(AppError::Route(format!(
            "ip route replace exited with {}",
            status
        )));
    }
    info!("route installed: {} via {}", destination, gateway);
    Ok(())
}
