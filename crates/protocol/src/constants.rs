//! Defaults shared by the client engine and the command-line tool.

use std::time::Duration;

/// Port the device peer listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 8080;

/// Time allowed for each blocking receive (handshake ack, ready ack,
/// final response drain). A timeout is "no message", not an I/O error;
/// the engine decides that it is terminal.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum inbound message size in bytes (1 MB).
///
/// The peer only ever sends small JSON or plain-text replies; anything
/// larger indicates a confused endpoint and is rejected by the
/// transport rather than buffered.
pub const MAX_MESSAGE_SIZE: usize = 1024 * 1024;
