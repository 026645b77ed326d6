//! Process-wide serve context.
//!
//! Built once at startup after both listeners are bound, shared by `Arc`
//! with the request handlers, and dropped when the process shuts down.

use std::net::SocketAddr;
use std::path::PathBuf;

use super::Shutdown;
use crate::actor::ws::ViewerRegistry;
use crate::render::WatchedDocument;

/// Everything a request or a live-reload component needs to know.
pub struct ServeContext {
    /// The single watched document
    pub document: WatchedDocument,
    /// Connected live viewers
    pub registry: ViewerRegistry,
    /// Bound HTTP address
    pub http_addr: SocketAddr,
    /// Bound live-reload socket port (injected into the viewer page)
    pub ws_port: u16,
    /// Root for static assets
    pub assets_dir: PathBuf,
    pub shutdown: Shutdown,
}

impl ServeContext {
    /// URL printed in the startup banner.
    pub fn url(&self) -> String {
        let host = match self.http_addr.ip() {
            ip if ip.is_unspecified() => "localhost".to_string(),
            std::net::IpAddr::V6(ip) => format!("[{ip}]"),
            ip => ip.to_string(),
        };
        format!("http://{}:{}", host, self.http_addr.port())
    }
}
