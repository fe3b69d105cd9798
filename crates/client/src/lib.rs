//! Client-side transfer engine: one persistent WebSocket session per
//! peer, driven through a strictly sequential state machine —
//! handshake, metadata, chunked data, completion, response drain.

pub mod engine;
pub mod error;
pub mod session;
pub mod transport;
pub mod types;

// Re-export primary types for convenience.
pub use engine::{EngineOptions, PushEngine};
pub use error::ClientError;
pub use session::WsSession;
pub use transport::Transport;
pub use types::{Outcome, ProgressEvent};
