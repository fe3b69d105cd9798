//! Error taxonomy for the client engine.
//!
//! Every variant is terminal for the current upload attempt; the
//! engine never retries on its own. Retry policy, if any, belongs to
//! the caller.

use tokio_tungstenite::tungstenite;

use sideload_transfer::TransferError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Could not establish the transport.
    #[error("connection error: {0}")]
    Connect(#[source] tungstenite::Error),

    /// Peer did not acknowledge the handshake per protocol.
    #[error("unexpected handshake: {0}")]
    Handshake(String),

    /// I/O failure while writing a message.
    #[error("send error: {0}")]
    Send(#[source] tungstenite::Error),

    /// Send failure mid-stream. Partial data is not retracted; the
    /// peer must cope with truncated transfers.
    #[error("transfer interrupted: {0}")]
    TransferInterrupted(String),

    /// I/O failure while reading a message.
    #[error("receive error: {0}")]
    Receive(#[source] tungstenite::Error),

    /// The connection went away (close frame or stream end).
    #[error("connection closed")]
    Closed,

    /// No message arrived within the bound.
    #[error("response timeout")]
    ResponseTimeout,

    /// Peer sent a message not valid for the current state.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Peer explicitly signaled failure, with its reason.
    #[error("peer reported failure: {0}")]
    PeerReported(String),

    /// Reply matched neither the structured nor the legacy dialect.
    #[error("unrecognized response: {0}")]
    Unrecognized(String),

    /// Operator cancelled the attempt.
    #[error("cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_reason() {
        let err = ClientError::PeerReported("disk full".into());
        assert_eq!(err.to_string(), "peer reported failure: disk full");

        let err = ClientError::Handshake("expected connected, got ready".into());
        assert!(err.to_string().contains("ready"));

        let err = ClientError::ResponseTimeout;
        assert_eq!(err.to_string(), "response timeout");
    }
}
