use std::io::ErrorKind;
use std::net::TcpStream;

use thiserror::Error;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use crate::reload::message::Signal;

/// A viewer could not receive a signal. The connection is dropped.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,
    #[error(transparent)]
    Transport(Box<tungstenite::Error>),
}

impl From<tungstenite::Error> for DeliveryError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                Self::Closed
            }
            other => Self::Transport(Box::new(other)),
        }
    }
}

/// Result of one non-blocking read from a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing to read
    Idle,
    /// Viewer sent a payload (ignored)
    Message,
    /// Viewer started the close handshake
    CloseRequested,
    /// Transport is gone
    Closed,
}

/// Transport behind one viewer connection.
pub trait ViewerSocket: Send {
    fn deliver(&mut self, signal: Signal) -> Result<(), DeliveryError>;

    /// Non-blocking read.
    fn poll(&mut self) -> PollOutcome;

    /// Send a close frame. Best effort.
    fn begin_close(&mut self);
}

impl ViewerSocket for WebSocket<TcpStream> {
    fn deliver(&mut self, signal: Signal) -> Result<(), DeliveryError> {
        match self.send(signal.to_message()) {
            Ok(()) => Ok(()),
            // Frame is buffered, the next read or write flushes it
            Err(tungstenite::Error::Io(e)) if e.kind() == ErrorKind::WouldBlock => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn poll(&mut self) -> PollOutcome {
        match self.read() {
            Ok(Message::Close(_)) => PollOutcome::CloseRequested,
            Ok(_) => PollOutcome::Message,
            Err(tungstenite::Error::Io(ref e)) if e.kind() == ErrorKind::WouldBlock => {
                PollOutcome::Idle
            }
            Err(_) => PollOutcome::Closed,
        }
    }

    fn begin_close(&mut self) {
        let _ = self.close(None);
        let _ = self.flush();
    }
}
