//! WebSocket transport session.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace};

use sideload_protocol::classify;
use sideload_protocol::constants::MAX_MESSAGE_SIZE;

use crate::error::ClientError;
use crate::transport::Transport;

/// One live connection to a device peer.
///
/// Exclusively owns the underlying stream. After [`close`](WsSession::close)
/// (or a close frame from the peer) every operation fails with
/// [`ClientError::Closed`]; close itself stays safe to call again.
pub struct WsSession {
    stream: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    peer: String,
}

impl WsSession {
    /// Opens the persistent connection to `ws://host:port`.
    ///
    /// Fails fast; no retry, the underlying cause is surfaced.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let url = format!("ws://{host}:{port}");
        debug!(%url, "connecting");

        let mut ws_config = tokio_tungstenite::tungstenite::protocol::WebSocketConfig::default();
        ws_config.max_message_size = Some(MAX_MESSAGE_SIZE);
        ws_config.max_frame_size = Some(MAX_MESSAGE_SIZE);
        let (stream, _) =
            tokio_tungstenite::connect_async_with_config(&url, Some(ws_config), false)
                .await
                .map_err(ClientError::Connect)?;

        info!(peer = %url, "connected");
        Ok(Self {
            stream: Some(stream),
            peer: url,
        })
    }

    async fn send(&mut self, msg: tungstenite::Message) -> Result<(), ClientError> {
        let stream = self.stream.as_mut().ok_or(ClientError::Closed)?;
        stream.send(msg).await.map_err(ClientError::Send)
    }

    async fn recv(&mut self, timeout: Duration) -> Result<Option<sideload_protocol::PeerMessage>, ClientError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let stream = self.stream.as_mut().ok_or(ClientError::Closed)?;
            match tokio::time::timeout_at(deadline, stream.next()).await {
                // Timeout is absence, not an error.
                Err(_) => return Ok(None),
                Ok(None) => {
                    self.stream = None;
                    return Err(ClientError::Closed);
                }
                Ok(Some(Err(e))) => return Err(ClientError::Receive(e)),
                Ok(Some(Ok(frame))) => match frame {
                    tungstenite::Message::Text(text) => {
                        let msg = classify(text.as_str());
                        trace!(tag = msg.tag(), "received");
                        return Ok(Some(msg));
                    }
                    tungstenite::Message::Ping(data) => {
                        trace!("received ping, sending pong");
                        let _ = stream.send(tungstenite::Message::Pong(data)).await;
                    }
                    tungstenite::Message::Close(_) => {
                        debug!(peer = %self.peer, "peer sent close frame");
                        self.stream = None;
                        return Err(ClientError::Closed);
                    }
                    // Pong / binary — nothing to do within the wait.
                    _ => {}
                },
            }
        }
    }

    /// Closes the session and releases the handle. Idempotent.
    pub async fn shutdown(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.close(None).await;
            debug!(peer = %self.peer, "session closed");
        }
    }
}

impl Transport for WsSession {
    fn send_text(
        &mut self,
        payload: String,
    ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send + '_>> {
        Box::pin(async move { self.send(tungstenite::Message::Text(payload.into())).await })
    }

    fn send_binary(
        &mut self,
        payload: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<(), ClientError>> + Send + '_>> {
        Box::pin(async move { self.send(tungstenite::Message::Binary(payload.into())).await })
    }

    fn receive(
        &mut self,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Option<sideload_protocol::PeerMessage>, ClientError>> + Send + '_>>
    {
        Box::pin(async move { self.recv(timeout).await })
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move { self.shutdown().await })
    }
}
