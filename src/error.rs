//! Error types and exit codes for lockbroker

use std::process::ExitCode;
use thiserror::Error;

/// Main error type for lockbroker operations
///
/// Denials and unknown opcodes are not errors: the broker resolves them
/// locally and surfaces them to the requester as reply strings. This type
/// covers the client driver and the transport edges only.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Usage error: {message}")]
    Usage { message: String },

    #[error("Unexpected reply from broker: {reply}")]
    UnexpectedReply { reply: String },

    #[error("Connection closed by broker")]
    ConnectionClosed,

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BrokerError {
    /// Exit code for the client driver: every failure (usage error,
    /// unexpected reply, transport failure) maps to 1.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}

/// Result type alias for lockbroker operations
pub type Result<T> = std::result::Result<T, BrokerError>;
