//! Minimal transaction introspection for group-signing policy.
//!
//! Transactions are self-describing msgpack maps. The only field the host
//! ever interprets is the sender (`snd`); everything else is opaque and left
//! to the device to render and verify.

use serde::Deserialize;

use crate::error::{ConnectError, ConnectResult};

#[derive(Deserialize)]
struct SenderField {
    #[serde(rename = "snd")]
    sender: serde_bytes::ByteBuf,
}

/// Extracts the sender public key from an encoded transaction, hex-encoded
/// for comparison against the device key.
pub fn extract_sender_hex(txn: &[u8]) -> ConnectResult<String> {
    let fields: SenderField = rmp_serde::from_slice(txn)
        .map_err(|err| ConnectError::MalformedTransaction(err.to_string()))?;
    Ok(hex::encode(fields.sender))
}
