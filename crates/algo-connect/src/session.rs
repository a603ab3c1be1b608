//! Sequential chunked signing against the device.

use tracing::debug;

use apdu_codec::apdu::{ins, p1, p2};
use apdu_codec::response::decode_signature;
use apdu_codec::{ApduCommand, CHUNK_SIZE, SignResult, prepare_chunks};

use crate::channel::CommandChannel;
use crate::error::ConnectResult;

/// Drives one message through the device as a sequence of bounded chunks.
///
/// Chunks are sent strictly in order with exactly one command in flight; the
/// device cannot pipeline. A non-success verdict on any chunk ends the
/// session immediately and becomes its result; otherwise the last chunk's
/// decoded response is the result.
pub(crate) struct SigningSession<'a, C> {
    channel: &'a mut C,
    instruction: u8,
}

impl<'a, C> SigningSession<'a, C>
where
    C: CommandChannel + Send,
{
    /// Session over the msgpack transaction-signing instruction.
    pub(crate) fn transaction(channel: &'a mut C) -> Self {
        Self {
            channel,
            instruction: ins::SIGN_MSGPACK,
        }
    }

    /// Session over the arbitrary-data signing instruction.
    pub(crate) fn arbitrary(channel: &'a mut C) -> Self {
        Self {
            channel,
            instruction: ins::SIGN_ARBITRARY,
        }
    }

    /// Runs the full chunk sequence for `message`.
    ///
    /// `embedded_txn_count` is the number of device-signed transactions in
    /// the surrounding group; it rides on the first chunk's P1 (shifted left
    /// by one) so the device can render "transaction K of M" across the
    /// whole group.
    pub(crate) async fn run(
        &mut self,
        account_id: u32,
        message: &[u8],
        embedded_txn_count: Option<u8>,
    ) -> ConnectResult<SignResult> {
        let chunks = prepare_chunks(account_id, message, CHUNK_SIZE);
        let total = chunks.len();

        let mut result = None;
        for (index, chunk) in chunks.into_iter().enumerate() {
            let first = index == 0;
            let last = index + 1 == total;

            let mut p1_value = match (first, account_id) {
                (true, 0) => p1::FIRST,
                (true, _) => p1::FIRST_ACCOUNT_ID,
                (false, _) => p1::CONTINUATION,
            };
            if first {
                if let Some(count) = embedded_txn_count {
                    p1_value |= count << 1;
                }
            }
            let p2_value = if last { p2::LAST } else { p2::CONTINUATION };

            debug!(
                chunk = index + 1,
                total,
                p1 = p1_value,
                p2 = p2_value,
                len = chunk.len(),
                "sending signing chunk"
            );

            let raw = self
                .channel
                .exchange(
                    ApduCommand::new(self.instruction, p1_value, p2_value, chunk),
                    None,
                )
                .await?;
            let decoded = decode_signature(&raw)?;

            if !decoded.status.is_success() {
                debug!(status = decoded.status.as_u16(), "device ended session");
                return Ok(decoded);
            }
            result = Some(decoded);
        }

        // prepare_chunks yields at least one chunk, so the loop always ran.
        Ok(result.expect("session sent at least one chunk"))
    }
}
