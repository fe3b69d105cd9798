//! Chunked payload reading with progress tracking.

mod chunked;
mod digest;
mod progress;
mod types;

pub use chunked::{Chunk, ChunkReader};
pub use digest::file_digest;
pub use progress::percent_complete;
pub use types::TransferRequest;

/// Fixed chunk size: 64 KiB.
///
/// The peer reassembles the payload by concatenating binary messages
/// in arrival order, so the only constraint is the transport's frame
/// limit. 64 KiB matches what every deployed peer expects.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a regular file: {0}")]
    NotAFile(String),

    #[error("invalid file name: {0}")]
    InvalidName(String),
}
