//! Fatal startup errors.
//!
//! Only these terminate the process. Read, delivery and watch failures are
//! recovered where they happen.

use std::path::PathBuf;

use thiserror::Error;

use crate::cli::serve::PortError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("File not found: {}", .0.display())]
    DocumentMissing(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error("failed to start HTTP server on port {port}: {reason}")]
    Bind { port: u16, reason: String },

    #[error("failed to start live-reload socket on port {port}")]
    LiveSocket {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start background worker")]
    Spawn(#[source] std::io::Error),

    #[error("failed to watch document")]
    Watch(#[from] notify::Error),

    #[error("failed to set Ctrl+C handler")]
    Signal(#[from] ctrlc::Error),
}

impl StartupError {
    /// Whether the usage text should follow the error message.
    pub fn wants_usage(&self) -> bool {
        matches!(self, Self::DocumentMissing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_missing_message() {
        let err = StartupError::DocumentMissing(PathBuf::from("/tmp/nope.md"));
        assert_eq!(err.to_string(), "File not found: /tmp/nope.md");
        assert!(err.wants_usage());
    }

    #[test]
    fn test_port_error_is_transparent() {
        let err: StartupError = PortError::Exhausted {
            start: 8080,
            last: 8089,
            attempts: 10,
        }
        .into();
        assert!(err.to_string().contains("10 attempts"));
        assert!(!err.wants_usage());
    }
}
