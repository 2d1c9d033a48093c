// Environment-based configuration and link cost resolution

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub router_id: String,
    pub port: u16,
    pub hello_interval: u64,
    pub lsa_interval: u64,
}

impl Config {
    /// Read the daemon configuration from the process environment.
    /// `CONTAINER_NAME` is the router identity and is required; the port
    /// and timer periods have defaults.
    pub fn from_env() -> Result<Self> {
        let router_id = std::env::var("CONTAINER_NAME")
            .ok()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Config("CONTAINER_NAME is not set".to_string()))?;

        Ok(Self {
            router_id,
            port: env_or("ROUTER_PORT", crate::DEFAULT_PORT)?,
            hello_interval: env_or("HELLO_INTERVAL_SEC", crate::DEFAULT_HELLO_INTERVAL_SEC)?,
            lsa_interval: env_or("LSA_INTERVAL_SEC", crate::DEFAULT_LSA_INTERVAL_SEC)?,
        })
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("invalid {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

/// Cost of the link between this router and a neighbor, read from
/// `COST_<A>_<B>_net`. Adjacent routers disagree on which endpoint comes
/// first in the key, so both orderings are accepted. A miss on both is a
/// configuration error.
pub fn link_cost(router_id: &str, neighbor_id: &str) -> Result<u32> {
    let raw = std::env::var(format!("COST_{}_{}_net", router_id, neighbor_id))
        .or_else(|_| std::env::var(format!("COST_{}_{}_net", neighbor_id, router_id)))
        .map_err(|_| {
            AppError::Config(format!(
                "no cost configured for link {} <-> {}",
                router_id, neighbor_id
            ))
        })?;

    raw.trim().parse::<u32>().map_err(|e| {
        AppError::Config(format!(
            "invalid cost for link {} <-> {}: {}",
            router_id, neighbor_id, e
        ))
    })
}
