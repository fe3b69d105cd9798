//! Outbound message framing.
//!
//! The client emits exactly three kinds of text messages: the file
//! metadata, the completion signal, and nothing else — data travels as
//! raw binary frames. Which framing is used is a configuration
//! decision, not negotiated on the wire.

use serde::Serialize;

/// Outbound framing dialect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dialect {
    /// Structured JSON messages.
    #[default]
    Json,
    /// Colon-delimited / literal-token messages spoken by older peers.
    Legacy,
}

#[derive(Serialize)]
struct FileInfo<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'a str,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<&'a str>,
}

#[derive(Serialize)]
struct TransferComplete {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Builds the metadata message announcing the payload.
///
/// The digest rides along only in the JSON dialect; the legacy framing
/// has no field for it.
pub fn file_info(
    dialect: Dialect,
    name: &str,
    size: u64,
    hash: Option<&str>,
) -> Result<String, serde_json::Error> {
    match dialect {
        Dialect::Json => serde_json::to_string(&FileInfo {
            kind: "file_info",
            name,
            size,
            hash,
        }),
        Dialect::Legacy => Ok(format!("FILE_INFO:{name}:{size}")),
    }
}

/// Builds the completion signal sent after the last chunk.
pub fn transfer_complete(dialect: Dialect) -> Result<String, serde_json::Error> {
    match dialect {
        Dialect::Json => serde_json::to_string(&TransferComplete {
            kind: "transfer_complete",
        }),
        Dialect::Legacy => Ok("TRANSFER_COMPLETE".to_string()),
    }
}
