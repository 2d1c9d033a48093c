// Library interface of the link-state routing daemon

pub mod config;
pub mod error;
pub mod hello;
pub mod init;
pub mod interfaces;
pub mod lsa;
pub mod lsdb;
pub mod neighbor;
pub mod net_utils;
pub mod packet_loop;
pub mod route;
pub mod tasks;
pub mod types;

pub use error::{AppError, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::interfaces::Interface;
use crate::lsdb::Lsdb;
use crate::neighbor::NeighborTable;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HELLO_INTERVAL_SEC: u64 = 10;
pub const DEFAULT_LSA_INTERVAL_SEC: u64 = 30;
pub const RECV_BUFFER_SIZE: usize = 4096;

/// State shared by the receiver and the two emitters. The LSDB is written
/// from the receive path and from the originated-LSA self-ingest path, so
/// it sits behind its own mutex; emitters copy snapshots out of the
/// neighbor table and never hold a lock across a send.
pub struct AppState {
    pub config: Config,
    pub interfaces: Vec<Interface>,
    pub neighbors: NeighborTable,
    pub lsdb: Mutex<Lsdb>,
    lsa_started: AtomicBool,
}

impl AppState {
    pub fn new(config: Config, interfaces: Vec<Interface>) -> Self {
        let lsdb = Lsdb::new(config.router_id.clone());
        Self {
            config,
            interfaces,
            neighbors: NeighborTable::new(),
            lsdb: Mutex::new(lsdb),
            lsa_started: AtomicBool::new(false),
        }
    }

    pub fn router_id(&self) -> &str {
        &self.config.router_id
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Claim the right to start the LSA emitter. Returns true exactly once.
    pub fn try_start_lsa(&self) -> bool {
        !self.lsa_started.swap(true, Ordering::SeqCst)
    }

    pub fn lsa_started(&self) -> bool {
        self.lsa_started.load(Ordering::SeqCst)
    }
}
