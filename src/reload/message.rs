//! Live-reload wire protocol.
//!
//! The server only ever sends one content-free text frame, `reload`. Viewers
//! re-fetch `/` to learn what changed. Anything a viewer sends is ignored.

use tungstenite::protocol::Message;

/// Signal broadcast to every open viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Document changed on disk, re-fetch the page
    Reload,
}

impl Signal {
    /// Text token carried on the wire
    pub const fn token(self) -> &'static str {
        match self {
            Self::Reload => "reload",
        }
    }

    /// Build the WebSocket frame for this signal
    pub fn to_message(self) -> Message {
        Message::Text(self.token().into())
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}
