use async_trait::async_trait;
use thiserror::Error;

use apdu_codec::ApduCommand;

/// Channel-level failures: disconnects, malformed or undersized responses,
/// and statuses outside the accepted set when one was supplied. These are
/// never produced for device verdicts the caller asked to receive as data.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("i/o error: {0}")]
    Io(String),
    #[error("unexpected device status 0x{0:04x}")]
    UnexpectedStatus(u16),
}

pub type ChannelResult<T> = std::result::Result<T, ChannelError>;

/// One request/response round trip to the device.
///
/// Implementations move raw byte buffers only; they know nothing about
/// chunking or response shapes. Responses must be delivered in order and
/// include the trailing 2-byte status word. When `accepted_status` is
/// `Some`, a response whose status is outside the set must be reported as
/// [`ChannelError::UnexpectedStatus`] instead of being returned.
#[async_trait]
pub trait CommandChannel {
    async fn exchange(
        &mut self,
        command: ApduCommand,
        accepted_status: Option<&[u16]>,
    ) -> ChannelResult<Vec<u8>>;
}
