//! Server lifecycle management.

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tiny_http::Server;
use tokio::sync::mpsc;

use super::port::{negotiate_port, port_after};
use crate::actor::messages::SyncEvent;
use crate::config::ServeConfig;
use crate::core::{Shutdown, StartupError};
use crate::log;

/// How long shutdown waits for background threads.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Negotiate a port and bind the HTTP server on it.
pub fn bind_http(serve: &ServeConfig) -> Result<(Server, SocketAddr), StartupError> {
    let port = negotiate_port(serve.interface, serve.port, serve.max_port_attempts)?;
    let addr = SocketAddr::new(serve.interface, port);
    let server = Server::http(addr).map_err(|e| StartupError::Bind {
        port,
        reason: e.to_string(),
    })?;
    Ok((server, addr))
}

/// Negotiate a port for the live-reload socket and bind it.
///
/// Probing starts at `ws_port` if configured, otherwise right after the
/// HTTP port.
pub fn bind_live_socket(serve: &ServeConfig, http_port: u16) -> Result<(TcpListener, u16), StartupError> {
    let preferred = match serve.ws_port {
        Some(port) => port,
        None => port_after(http_port)?,
    };
    let port = negotiate_port(serve.interface, preferred, serve.max_port_attempts)?;
    let listener = crate::reload::server::bind_live_socket(serve.interface, port)
        .map_err(|source| StartupError::LiveSocket { port, source })?;
    Ok((listener, port))
}

/// Install the Ctrl+C handler.
///
/// On signal: flag shutdown (new requests get 503), stop the actors (the
/// coordinator closes every viewer, the watcher is released) and unblock
/// the HTTP accept loop.
pub fn install_shutdown_handler(
    server: Arc<Server>,
    shutdown: Shutdown,
    events_tx: mpsc::Sender<SyncEvent>,
) -> Result<(), StartupError> {
    ctrlc::set_handler(move || {
        if !shutdown.trigger() {
            // Second Ctrl+C: stop waiting for a graceful exit
            std::process::exit(0);
        }
        log!("serve"; "shutting down...");
        let _ = events_tx.blocking_send(SyncEvent::Shutdown);
        server.unblock();
    })?;
    Ok(())
}

/// Wait for background threads to finish (bounded).
pub fn wait_for_shutdown(handles: Vec<JoinHandle<()>>) {
    let deadline = std::time::Instant::now() + SHUTDOWN_GRACE;
    for handle in handles {
        while !handle.is_finished() && std::time::Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
        if handle.is_finished() {
            let _ = handle.join();
        }
    }
}
