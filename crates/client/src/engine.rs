//! Transfer protocol engine.
//!
//! Drives the client state machine over one [`Transport`]:
//!
//! ```text
//! Disconnected -> Connecting -> AwaitingHandshakeAck -> Idle
//!   -> SendingMetadata -> AwaitingReady -> SendingData
//!   -> AwaitingFinalResponse -> Terminal(Succeeded | Failed)
//! ```
//!
//! The flow is strictly sequential: one blocking receive per waiting
//! state, no pipelining, every wait bounded by the configured timeout.
//! A failed attempt closes the session before the outcome is returned;
//! a successful one leaves it in Idle so the caller may upload again
//! without reconnecting.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use sideload_protocol::constants::RESPONSE_TIMEOUT;
use sideload_protocol::{Dialect, LegacyReply, PeerMessage, parse_legacy, wire};
use sideload_transfer::{CHUNK_SIZE, ChunkReader, TransferRequest, percent_complete};

use crate::error::ClientError;
use crate::session::WsSession;
use crate::transport::Transport;
use crate::types::{Outcome, ProgressEvent};

/// Engine configuration.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Outbound framing dialect. Not negotiated on the wire; pick the
    /// one the target peer speaks.
    pub dialect: Dialect,
    /// Bound on every blocking receive.
    pub response_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            response_timeout: RESPONSE_TIMEOUT,
        }
    }
}

/// Client state machine bound to one session.
///
/// Construction already performs the handshake: a [`PushEngine`] you
/// hold is in Idle, ready for [`upload`](PushEngine::upload).
pub struct PushEngine {
    transport: Box<dyn Transport>,
    options: EngineOptions,
    cancel: CancellationToken,
    events_tx: mpsc::UnboundedSender<ProgressEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<ProgressEvent>>,
}

impl PushEngine {
    /// Connects to the peer and awaits the handshake acknowledgement.
    pub async fn connect(
        host: &str,
        port: u16,
        options: EngineOptions,
    ) -> Result<Self, ClientError> {
        let session = WsSession::connect(host, port).await?;
        Self::with_transport(Box::new(session), options).await
    }

    /// Builds an engine over an already-open transport and performs
    /// the handshake. The transport is closed on any handshake
    /// failure before the error is returned.
    pub async fn with_transport(
        mut transport: Box<dyn Transport>,
        options: EngineOptions,
    ) -> Result<Self, ClientError> {
        let ack = transport.receive(options.response_timeout).await;
        match ack {
            Ok(Some(PeerMessage::Connected { message })) => {
                debug!(message = message.as_deref().unwrap_or(""), "handshake acknowledged");
            }
            Ok(Some(other)) => {
                warn!(tag = other.tag(), "unexpected handshake reply");
                transport.close().await;
                return Err(ClientError::Handshake(format!(
                    "expected connected, got {}",
                    other.tag()
                )));
            }
            Ok(None) => {
                transport.close().await;
                return Err(ClientError::ResponseTimeout);
            }
            Err(e) => {
                transport.close().await;
                return Err(e);
            }
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Ok(Self {
            transport,
            options,
            cancel: CancellationToken::new(),
            events_tx,
            events_rx: Some(events_rx),
        })
    }

    /// Takes the progress event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<ProgressEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this engine. Cancelling closes
    /// the session from whatever state the attempt is in.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Pushes one payload: metadata, chunked data, completion signal,
    /// then drains responses until a terminal reply.
    ///
    /// Exactly one [`Outcome`] per call. Nothing is retried; on
    /// failure the session is closed before returning.
    pub async fn upload(&mut self, request: &TransferRequest) -> Outcome {
        info!(name = %request.name, size = request.size, "starting upload");

        match self.run_upload(request).await {
            Ok(()) => {
                info!(name = %request.name, "upload succeeded");
                Outcome::Succeeded
            }
            Err(e) => {
                error!(name = %request.name, error = %e, "upload failed");
                self.close().await;
                Outcome::Failed(e)
            }
        }
    }

    /// Closes the session. Idempotent.
    pub async fn close(&mut self) {
        self.transport.close().await;
    }

    async fn run_upload(&mut self, request: &TransferRequest) -> Result<(), ClientError> {
        self.check_cancelled()?;

        // Metadata.
        if let Some(digest) = &request.digest {
            debug!(%digest, "content digest");
        }
        let metadata = wire::file_info(
            self.options.dialect,
            &request.name,
            request.size,
            request.digest.as_deref(),
        )?;
        self.transport.send_text(metadata).await?;
        debug!(name = %request.name, size = request.size, "metadata sent");

        // Peer must prime itself before any data flows.
        match self.recv_bounded().await? {
            PeerMessage::Ready { .. } => debug!("peer ready"),
            other => {
                return Err(ClientError::ProtocolViolation(format!(
                    "expected ready, got {}",
                    other.tag()
                )));
            }
        }

        // Stream chunks in order, one binary message each.
        let mut reader = ChunkReader::new(&request.path, CHUNK_SIZE)?;
        let total = reader.file_size();
        while let Some(chunk) = reader.next_chunk()? {
            self.check_cancelled()?;
            self.transport
                .send_binary(chunk.data)
                .await
                .map_err(|e| ClientError::TransferInterrupted(e.to_string()))?;

            let sent = reader.offset();
            let _ = self.events_tx.send(ProgressEvent {
                sent,
                total,
                percent: percent_complete(sent, total),
            });
        }

        // Completion signal.
        self.transport
            .send_text(wire::transfer_complete(self.options.dialect)?)
            .await?;
        debug!("completion signal sent");

        // Drain replies until a terminal one.
        loop {
            match self.recv_bounded().await? {
                PeerMessage::Progress {
                    received, total, ..
                } => {
                    debug!(?received, ?total, "peer progress");
                }
                PeerMessage::Broadcast { message } => {
                    info!(message = message.as_deref().unwrap_or(""), "peer broadcast");
                }
                PeerMessage::Success { message } => {
                    debug!(message = message.as_deref().unwrap_or(""), "peer confirmed install");
                    return Ok(());
                }
                PeerMessage::Error { message } => {
                    return Err(ClientError::PeerReported(
                        message.unwrap_or_else(|| "unspecified peer error".into()),
                    ));
                }
                PeerMessage::Unknown { text } => {
                    return match parse_legacy(&text) {
                        Some(LegacyReply::Success) => {
                            debug!("legacy success token");
                            Ok(())
                        }
                        Some(LegacyReply::Error(reason)) => Err(ClientError::PeerReported(reason)),
                        None => Err(ClientError::Unrecognized(text)),
                    };
                }
                other => {
                    return Err(ClientError::ProtocolViolation(format!(
                        "unexpected {} after completion",
                        other.tag()
                    )));
                }
            }
        }
    }

    /// One bounded receive, raced against cancellation. Absence is
    /// promoted to the terminal timeout here — that decision belongs
    /// to the engine, not the transport.
    async fn recv_bounded(&mut self) -> Result<PeerMessage, ClientError> {
        let cancel = self.cancel.clone();
        let msg = tokio::select! {
            _ = cancel.cancelled() => return Err(ClientError::Cancelled),
            r = self.transport.receive(self.options.response_timeout) => r?,
        };
        msg.ok_or(ClientError::ResponseTimeout)
    }

    fn check_cancelled(&self) -> Result<(), ClientError> {
        if self.cancel.is_cancelled() {
            Err(ClientError::Cancelled)
        } else {
            Ok(())
        }
    }
}
