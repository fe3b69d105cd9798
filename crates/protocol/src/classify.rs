//! Inbound response classification.
//!
//! The peer may answer in the structured JSON dialect or in the legacy
//! plain-text one, and old firmwares mix both on a single connection.
//! Everything inbound is funneled through [`classify`], which maps any
//! payload to exactly one [`PeerMessage`] tag — malformed input is not
//! an error here, it is the `Unknown` tag carrying the text verbatim.

use serde::Deserialize;

/// Literal token the legacy dialect sends on a successful install.
pub const LEGACY_SUCCESS: &str = "TRANSFER_SUCCESS";

/// Prefixes the legacy dialect uses for failure replies. The remainder
/// of the line is the human-readable reason.
pub const LEGACY_ERROR_PREFIXES: [&str; 2] = ["COMMAND_ERROR:", "ERROR:"];

/// A classified inbound message. Closed set: every payload the peer
/// can send maps to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerMessage {
    /// Handshake acknowledged; sent right after the socket opens.
    Connected { message: Option<String> },
    /// Peer is primed to receive binary data.
    Ready { message: Option<String> },
    /// Peer-reported ingestion progress.
    Progress {
        message: Option<String>,
        progress: Option<u64>,
        received: Option<u64>,
        total: Option<u64>,
    },
    /// Informational side-channel message.
    Broadcast { message: Option<String> },
    /// Transfer and install succeeded.
    Success { message: Option<String> },
    /// Peer reported a failure, with reason.
    Error { message: Option<String> },
    /// Anything that did not decode as a structured message, raw text
    /// preserved verbatim (legacy dialect lands here).
    Unknown { text: String },
}

impl PeerMessage {
    /// Short tag name for logging and error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            PeerMessage::Connected { .. } => "connected",
            PeerMessage::Ready { .. } => "ready",
            PeerMessage::Progress { .. } => "progress",
            PeerMessage::Broadcast { .. } => "broadcast",
            PeerMessage::Success { .. } => "success",
            PeerMessage::Error { .. } => "error",
            PeerMessage::Unknown { .. } => "unknown",
        }
    }
}

/// Structured reply shape. Extra keys are ignored; only `type` is
/// required for a payload to count as structured.
#[derive(Debug, Deserialize)]
struct RawReply {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    progress: Option<u64>,
    #[serde(default)]
    received: Option<u64>,
    #[serde(default)]
    total: Option<u64>,
}

/// Classifies a raw inbound payload. Never fails: payloads that do not
/// decode as a structured reply (or carry an unrecognized `type`)
/// become [`PeerMessage::Unknown`] with the original text.
pub fn classify(text: &str) -> PeerMessage {
    let Ok(raw) = serde_json::from_str::<RawReply>(text) else {
        return PeerMessage::Unknown {
            text: text.to_string(),
        };
    };

    match raw.kind.as_str() {
        "connected" => PeerMessage::Connected {
            message: raw.message,
        },
        "ready" => PeerMessage::Ready {
            message: raw.message,
        },
        "progress" => PeerMessage::Progress {
            message: raw.message,
            progress: raw.progress,
            received: raw.received,
            total: raw.total,
        },
        "broadcast" => PeerMessage::Broadcast {
            message: raw.message,
        },
        "success" => PeerMessage::Success {
            message: raw.message,
        },
        "error" => PeerMessage::Error {
            message: raw.message,
        },
        _ => PeerMessage::Unknown {
            text: text.to_string(),
        },
    }
}

/// Terminal meaning of a legacy plain-text reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegacyReply {
    Success,
    Error(String),
}

/// Interprets an [`PeerMessage::Unknown`] payload under the legacy
/// dialect. Returns `None` when the text matches no legacy pattern.
pub fn parse_legacy(text: &str) -> Option<LegacyReply> {
    if text == LEGACY_SUCCESS {
        return Some(LegacyReply::Success);
    }
    for prefix in LEGACY_ERROR_PREFIXES {
        if let Some(reason) = text.strip_prefix(prefix) {
            return Some(LegacyReply::Error(reason.trim().to_string()));
        }
    }
    None
}
