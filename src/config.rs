use std::net::{Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};

/// Runtime settings for the HTTP server
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Start with the demo expenses and stores instead of empty collections
    pub seed: bool,
    /// Allow any origin (the API is meant to be called from a separate frontend)
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000)),
            seed: true,
            permissive_cors: true,
        }
    }
}
