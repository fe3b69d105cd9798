//! Wire protocol spoken between the sideload client and a device peer.
//!
//! The peer accepts one payload per transfer over a persistent
//! WebSocket: a metadata message, the raw bytes in binary chunks, a
//! completion signal, then one or more replies ending in a terminal
//! verdict. Two framings exist in the wild — a structured JSON dialect
//! and the older colon/plain-text dialect — and this crate owns both.

pub mod classify;
pub mod constants;
pub mod wire;

// Re-export primary types for convenience.
pub use classify::{LegacyReply, PeerMessage, classify, parse_legacy};
pub use wire::Dialect;
