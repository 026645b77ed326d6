//! Port negotiation.
//!
//! Probe candidate ports in order, skipping only those already in use. The
//! probe listener is released before returning, so the caller binds the
//! real endpoint on the returned port right after.

use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr, TcpListener};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortError {
    #[error("no free port in {start}..={last} after {attempts} attempts")]
    Exhausted { start: u16, last: u16, attempts: u16 },

    #[error("no port left after {port}")]
    OutOfRange { port: u16 },

    #[error("cannot bind port {port}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
}

/// Find the first bindable port in `preferred..preferred + max_attempts`.
///
/// Only "address in use" moves on to the next candidate. Any other bind
/// failure (permission, bad interface) is returned as is.
pub fn negotiate_port(interface: IpAddr, preferred: u16, max_attempts: u16) -> Result<u16, PortError> {
    let mut last = preferred;
    let mut attempts = 0;

    for offset in 0..max_attempts {
        let Some(port) = preferred.checked_add(offset) else {
            break;
        };
        last = port;
        attempts += 1;

        match TcpListener::bind(SocketAddr::new(interface, port)) {
            Ok(probe) => {
                drop(probe);
                if offset > 0 {
                    crate::log!("serve"; "port {} in use, using {} instead", preferred, port);
                }
                return Ok(port);
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => {
                crate::debug!("serve"; "port {} in use", port);
            }
            Err(source) => return Err(PortError::Bind { port, source }),
        }
    }

    Err(PortError::Exhausted {
        start: preferred,
        last,
        attempts,
    })
}

/// First candidate after `port`, for endpoints that follow another one.
pub fn port_after(port: u16) -> Result<u16, PortError> {
    port.checked_add(1).ok_or(PortError::OutOfRange { port })
}
