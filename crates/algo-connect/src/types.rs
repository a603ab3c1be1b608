use serde::{Deserialize, Serialize};

use apdu_codec::StatusCode;

/// How [`StdSigData::data`] is encoded. Closed set; only base64 is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataEncoding {
    Base64,
}

/// Structured-signing scope. Closed set; only the authentication scope is
/// defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SigningScope {
    Auth,
}

/// A structured arbitrary-data signing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdSigData {
    /// Payload to sign, encoded per [`StdSignMetadata::encoding`].
    pub data: String,
    /// Public key the caller claims will sign; must match the device.
    pub signer: Vec<u8>,
    pub domain: Option<String>,
    pub request_id: Option<String>,
    pub authentication_data: Option<Vec<u8>>,
    /// Hierarchical key path selecting the signing account, e.g.
    /// `m/44'/283'/2'/0/0`.
    pub hd_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StdSignMetadata {
    pub scope: SigningScope,
    pub encoding: DataEncoding,
}

/// The request echoed back with the device's verdict.
///
/// `signature` is present exactly when `status` is success; a rejection is a
/// normal outcome carried as data, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdSigDataResponse {
    pub request: StdSigData,
    pub status: StatusCode,
    pub message: String,
    pub signature: Option<Vec<u8>>,
}
