use crate::error::ClientError;

/// Client-side progress after a chunk was handed to the transport.
/// Ephemeral, used only to drive UI feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Bytes sent so far.
    pub sent: u64,
    /// Total payload size.
    pub total: u64,
    /// Percentage complete, single decimal precision.
    pub percent: f64,
}

/// Terminal result of one upload attempt. Produced exactly once per
/// [`PushEngine::upload`](crate::engine::PushEngine::upload) call.
#[derive(Debug)]
pub enum Outcome {
    Succeeded,
    Failed(ClientError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded)
    }
}
