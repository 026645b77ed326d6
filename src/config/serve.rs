//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 8080                 # Preferred HTTP port
//! ws_port = 8090              # Preferred live-reload socket port
//! max_port_attempts = 10      # Ports probed before giving up
//! debounce_ms = 0             # Coalescing window for rapid saves (0 = off)
//! assets = "./static"         # Static asset directory
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use serde::Deserialize;

/// Default preferred HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default number of ports probed before startup fails.
pub const DEFAULT_MAX_PORT_ATTEMPTS: u16 = 10;

/// Development server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// Preferred HTTP port. Taken ports are skipped.
    pub port: u16,

    /// Preferred live-reload socket port. `None` probes from `port + 1`.
    pub ws_port: Option<u16>,

    /// Consecutive ports probed before startup fails.
    pub max_port_attempts: u16,

    /// Coalescing window in milliseconds. `0` broadcasts every change.
    pub debounce_ms: u64,

    /// Static asset directory. `None` uses the executable's directory.
    pub assets: Option<PathBuf>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: DEFAULT_PORT,
            ws_port: None,
            max_port_attempts: DEFAULT_MAX_PORT_ATTEMPTS,
            debounce_ms: 0,
            assets: None,
        }
    }
}
