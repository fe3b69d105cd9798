//! Abstract message transport.
//!
//! The engine talks to the peer through this trait rather than a
//! concrete socket, keeping the state machine decoupled from the
//! WebSocket stack and testable with scripted mocks.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use sideload_protocol::PeerMessage;

use crate::error::ClientError;

/// One persistent, ordered, message-oriented connection to a peer.
///
/// Messages arrive at the peer in send order; the transport delivers
/// discrete messages, never a byte stream, so the engine does not
/// frame or split anything itself.
pub trait Transport: Send {
    /// Writes one text message.
    fn send_text(
        &mut self,
        payload: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send + '_>>;

    /// Writes one binary message.
    fn send_binary(
        &mut self,
        payload: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send + '_>>;

    /// Waits for one inbound message, already classified.
    ///
    /// `Ok(None)` means the timeout elapsed — absence, not an error.
    /// Errors are I/O failures or a dead connection.
    fn receive(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<PeerMessage>, ClientError>> + Send + '_>>;

    /// Releases the underlying handle. Idempotent; safe to call from
    /// a cleanup path even if the connection never came up.
    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}
