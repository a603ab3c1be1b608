//! Validation and hash construction for the arbitrary-data (auth) signing
//! flow.
//!
//! The device signs `sha256(canonical client data JSON) || sha256(auth
//! data)`; this module derives that 64-byte string and the full on-wire
//! message. Everything here is pure so the whole flow is testable without a
//! device.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

use crate::error::{ConnectError, ConnectResult};
use crate::types::{DataEncoding, StdSigData};

/// Length of the to-be-signed digest pair.
pub const TO_SIGN_LEN: usize = 64;

/// Decodes the request payload per the declared encoding.
pub(crate) fn decode_payload(data: &str, encoding: DataEncoding) -> ConnectResult<Vec<u8>> {
    match encoding {
        DataEncoding::Base64 => BASE64
            .decode(data)
            .map_err(|_| ConnectError::MalformedPayload),
    }
}

/// Canonical serialization of a JSON document: sorted object keys, no
/// insignificant whitespace, shortest-round-trip numbers. Two documents with
/// the same key/value sets canonicalize to identical bytes regardless of
/// input ordering or formatting.
///
/// This is not RFC 8785 (JCS): non-integer numbers keep serde_json's
/// rendering, so `1.0` serializes as `1.0` where JCS would emit `1`. A
/// verifier recomputing the client-data hash over float-bearing documents
/// must canonicalize the same way.
pub(crate) fn canonify(json_text: &[u8]) -> ConnectResult<String> {
    let text = std::str::from_utf8(json_text).map_err(|_| ConnectError::MalformedJson)?;
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|_| ConnectError::MalformedJson)?;
    serde_json::to_string(&value).map_err(|_| ConnectError::MalformedJson)
}

/// Derives the 64-byte string the device signs for the auth scope.
///
/// Requires the domain and authentication data to be present, and the first
/// 32 bytes of the authentication data to equal `sha256(domain)` — the
/// relying-party commitment — before producing
/// `sha256(canonical client data) || sha256(authentication data)`.
pub(crate) fn auth_to_sign(
    request: &StdSigData,
    decoded_data: &[u8],
) -> ConnectResult<[u8; TO_SIGN_LEN]> {
    let canonical = canonify(decoded_data)?;

    let domain = request.domain.as_deref().ok_or(ConnectError::MissingDomain)?;
    let auth_data = request
        .authentication_data
        .as_deref()
        .ok_or(ConnectError::MissingAuthenticationData)?;

    let rp_id_hash = Sha256::digest(domain.as_bytes());
    if auth_data.len() < rp_id_hash.len() || auth_data[..rp_id_hash.len()] != rp_id_hash[..] {
        return Err(ConnectError::DomainAuthenticationFailed);
    }

    let client_data_hash = Sha256::digest(canonical.as_bytes());
    let authenticator_data_hash = Sha256::digest(auth_data);

    let mut to_sign = [0u8; TO_SIGN_LEN];
    to_sign[..32].copy_from_slice(&client_data_hash);
    to_sign[32..].copy_from_slice(&authenticator_data_hash);
    Ok(to_sign)
}

/// Assembles the on-wire message: digest pair, NUL-terminated domain, then
/// the decoded payload for on-device rendering.
pub(crate) fn build_wire_message(
    to_sign: &[u8; TO_SIGN_LEN],
    domain: &str,
    decoded_data: &[u8],
) -> Vec<u8> {
    let mut message = Vec::with_capacity(TO_SIGN_LEN + domain.len() + 1 + decoded_data.len());
    message.extend_from_slice(to_sign);
    message.extend_from_slice(domain.as_bytes());
    message.push(0x00);
    message.extend_from_slice(decoded_data);
    message
}

/// Parses the account index out of a hierarchical key path such as
/// `m/44'/283'/2'/0/0` (fourth `/`-separated segment, hardened marker
/// stripped).
pub(crate) fn parse_account_from_path(path: &str) -> ConnectResult<u32> {
    let segment = path
        .split('/')
        .nth(3)
        .ok_or_else(|| ConnectError::MalformedKeyPath(path.to_owned()))?;
    segment
        .trim_end_matches('\'')
        .parse::<u32>()
        .map_err(|_| ConnectError::MalformedKeyPath(path.to_owned()))
}
