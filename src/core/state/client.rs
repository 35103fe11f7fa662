// src/core/state/client.rs

//! Contains state definitions related to client connections.

use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

pub type ShutdownSender = broadcast::Sender<()>;
pub type ClientMap = Arc<DashMap<u64, (ClientInfo, ShutdownSender)>>;

#[derive(Debug, Clone)]
pub struct ClientInfo {
    pub addr: SocketAddr,
    pub session_id: u64,
    pub last_command_time: Instant,
}

impl ClientInfo {
    pub fn new(addr: SocketAddr, session_id: u64) -> Self {
        Self {
            addr,
            session_id,
            last_command_time: Instant::now(),
        }
    }
}
