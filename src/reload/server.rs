//! Live-reload socket server.
//!
//! A dedicated TCP listener accepts viewer connections, performs the
//! WebSocket handshake and hands each socket to the Sync Coordinator.
//! A second thread polls open sockets so closes are noticed promptly.

use std::io::{self, ErrorKind};
use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tungstenite::WebSocket;

use crate::actor::messages::SyncEvent;
use crate::actor::ws::ViewerRegistry;
use crate::core::Shutdown;

/// Idle wait between accept attempts and between read polls.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound for a client to finish the handshake.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Bind the live-reload listener in non-blocking mode.
pub fn bind_live_socket(interface: IpAddr, port: u16) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(SocketAddr::new(interface, port))?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}

/// Accept viewers until shutdown, enqueueing each one to the coordinator.
pub fn spawn_acceptor(
    listener: TcpListener,
    events_tx: mpsc::Sender<SyncEvent>,
    shutdown: Shutdown,
) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            if shutdown.is_requested() {
                break;
            }

            match listener.accept() {
                Ok((stream, addr)) => {
                    crate::debug!("ws"; "connection from {}", addr);
                    let ws = match handshake(stream) {
                        Ok(ws) => ws,
                        Err(e) => {
                            crate::log!("ws"; "handshake failed: {}", e);
                            continue;
                        }
                    };
                    if events_tx
                        .blocking_send(SyncEvent::ViewerConnected(Box::new(ws)))
                        .is_err()
                    {
                        break; // Coordinator gone
                    }
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    if shutdown.wait_timeout(POLL_INTERVAL) {
                        break;
                    }
                }
                Err(e) => {
                    crate::log!("ws"; "accept error: {}", e);
                    if shutdown.wait_timeout(POLL_INTERVAL) {
                        break;
                    }
                }
            }
        }
        crate::debug!("ws"; "acceptor stopped");
    })
}

/// Poll every registered viewer until shutdown.
pub fn spawn_viewer_poller(registry: ViewerRegistry, shutdown: Shutdown) -> JoinHandle<()> {
    thread::spawn(move || {
        while !shutdown.wait_timeout(POLL_INTERVAL) {
            registry.poll_incoming();
        }
    })
}

/// Blocking handshake with a timeout, then switch to non-blocking reads.
fn handshake(stream: TcpStream) -> Result<WebSocket<TcpStream>> {
    stream.set_nonblocking(false)?;
    stream.set_read_timeout(Some(HANDSHAKE_TIMEOUT))?;

    let ws = tungstenite::accept(stream).map_err(|e| anyhow::anyhow!("{e}"))?;

    ws.get_ref().set_read_timeout(None)?;
    ws.get_ref().set_nonblocking(true)?;
    Ok(ws)
}
