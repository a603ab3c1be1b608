//! Response decoding for each command the host issues.
//!
//! Every raw response ends with a 2-byte big-endian status word; everything
//! before it is command-specific. [`decode_response`] is the single entry
//! point, dispatching on [`ResponseKind`] so magic offsets stay in one place.
//! A response shorter than the status word is a channel-level failure and is
//! the only way decoding itself can error besides a truncated payload.

use thiserror::Error;

use crate::apdu::PK_LEN;
use crate::status::StatusCode;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("response_too_short")]
    ResponseTooShort,
    #[error("payload_truncated")]
    PayloadTruncated,
}

/// Which command produced the response being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Version,
    Address,
    AppInfo,
    DeviceInfo,
    Signature,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedResponse {
    Version(VersionInfo),
    Address(AddressResponse),
    AppInfo(AppInfo),
    DeviceInfo(DeviceInfo),
    Signature(SignResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub test_mode: bool,
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub device_locked: bool,
    pub target_id: String,
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressResponse {
    pub public_key: [u8; PK_LEN],
    pub address: String,
    pub status: StatusCode,
    pub message: String,
}

impl AddressResponse {
    /// Hex rendering of the public key, the form used for sender comparison.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub app_name: String,
    pub app_version: String,
    pub flag_len: u8,
    pub flags_value: u8,
    pub flag_recovery: bool,
    pub flag_signed_mcu_code: bool,
    pub flag_onboarded: bool,
    pub flag_pin_validated: bool,
    pub status: StatusCode,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub target_id: String,
    pub se_version: String,
    pub flag: String,
    pub mcu_version: String,
    pub status: StatusCode,
    pub message: String,
}

/// Outcome of one signing command (or a whole signing session, which reports
/// its final chunk's outcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignResult {
    pub status: StatusCode,
    pub message: String,
    pub signature: Option<Vec<u8>>,
}

/// Decodes `raw` as a response to a `kind` command.
pub fn decode_response(raw: &[u8], kind: ResponseKind) -> Result<DecodedResponse, DecodeError> {
    let (payload, status) = split_status(raw)?;
    Ok(match kind {
        ResponseKind::Version => DecodedResponse::Version(parse_version(payload, status)?),
        ResponseKind::Address => DecodedResponse::Address(parse_address(payload, status)?),
        ResponseKind::AppInfo => DecodedResponse::AppInfo(parse_app_info(payload, status)?),
        ResponseKind::DeviceInfo => DecodedResponse::DeviceInfo(parse_device_info(payload, status)?),
        ResponseKind::Signature => DecodedResponse::Signature(parse_signature(payload, status)),
    })
}

pub fn decode_version(raw: &[u8]) -> Result<VersionInfo, DecodeError> {
    let (payload, status) = split_status(raw)?;
    parse_version(payload, status)
}

pub fn decode_address(raw: &[u8]) -> Result<AddressResponse, DecodeError> {
    let (payload, status) = split_status(raw)?;
    parse_address(payload, status)
}

pub fn decode_app_info(raw: &[u8]) -> Result<AppInfo, DecodeError> {
    let (payload, status) = split_status(raw)?;
    parse_app_info(payload, status)
}

pub fn decode_device_info(raw: &[u8]) -> Result<DeviceInfo, DecodeError> {
    let (payload, status) = split_status(raw)?;
    parse_device_info(payload, status)
}

pub fn decode_signature(raw: &[u8]) -> Result<SignResult, DecodeError> {
    let (payload, status) = split_status(raw)?;
    Ok(parse_signature(payload, status))
}

fn split_status(raw: &[u8]) -> Result<(&[u8], StatusCode), DecodeError> {
    if raw.len() < 2 {
        return Err(DecodeError::ResponseTooShort);
    }
    let (payload, trailer) = raw.split_at(raw.len() - 2);
    let code = u16::from_be_bytes([trailer[0], trailer[1]]);
    Ok((payload, StatusCode::from_u16(code)))
}

fn parse_version(payload: &[u8], status: StatusCode) -> Result<VersionInfo, DecodeError> {
    if payload.len() < 9 {
        return Err(DecodeError::PayloadTruncated);
    }
    Ok(VersionInfo {
        test_mode: payload[0] != 0,
        major: payload[1],
        minor: payload[2],
        patch: payload[3],
        device_locked: payload[4] != 0,
        target_id: hex::encode(&payload[5..9]),
        status,
        message: status.message(),
    })
}

fn parse_address(payload: &[u8], status: StatusCode) -> Result<AddressResponse, DecodeError> {
    if payload.len() < PK_LEN {
        return Err(DecodeError::PayloadTruncated);
    }
    let mut public_key = [0u8; PK_LEN];
    public_key.copy_from_slice(&payload[..PK_LEN]);
    let address = String::from_utf8_lossy(&payload[PK_LEN..]).into_owned();
    Ok(AddressResponse {
        public_key,
        address,
        status,
        message: status.message(),
    })
}

fn parse_app_info(payload: &[u8], status: StatusCode) -> Result<AppInfo, DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::PayloadTruncated);
    }

    // The dashboard responds with format ID 1; no other format is specified.
    if payload[0] != 1 {
        return Ok(AppInfo {
            app_name: String::new(),
            app_version: String::new(),
            flag_len: 0,
            flags_value: 0,
            flag_recovery: false,
            flag_signed_mcu_code: false,
            flag_onboarded: false,
            flag_pin_validated: false,
            status: StatusCode::DeviceBusy,
            message: "response format ID not recognized".to_owned(),
        });
    }

    let mut cursor = Cursor::new(&payload[1..]);
    let app_name = String::from_utf8_lossy(cursor.take_length_prefixed()?).into_owned();
    let app_version = String::from_utf8_lossy(cursor.take_length_prefixed()?).into_owned();
    let flag_len = cursor.take_byte()?;
    let flags_value = cursor.take_byte()?;

    Ok(AppInfo {
        app_name,
        app_version,
        flag_len,
        flags_value,
        flag_recovery: flags_value & 0x01 != 0,
        flag_signed_mcu_code: flags_value & 0x02 != 0,
        flag_onboarded: flags_value & 0x04 != 0,
        flag_pin_validated: flags_value & 0x80 != 0,
        status,
        message: status.message(),
    })
}

fn parse_device_info(payload: &[u8], status: StatusCode) -> Result<DeviceInfo, DecodeError> {
    // Issued against the dashboard; inside an app the device answers 0x6e00
    // with no payload to parse.
    if status == StatusCode::AppNotOpen {
        return Ok(DeviceInfo {
            target_id: String::new(),
            se_version: String::new(),
            flag: String::new(),
            mcu_version: String::new(),
            status,
            message: "This command is only available in the Dashboard".to_owned(),
        });
    }

    if payload.len() < 4 {
        return Err(DecodeError::PayloadTruncated);
    }
    let target_id = hex::encode(&payload[..4]);

    let mut cursor = Cursor::new(&payload[4..]);
    let se_version = String::from_utf8_lossy(cursor.take_length_prefixed()?).into_owned();
    let flag = hex::encode(cursor.take_length_prefixed()?);
    let mut mcu_bytes = cursor.take_length_prefixed()?;
    // Some MCU firmwares include the trailing zero terminator in the field.
    if let Some((&0, rest)) = mcu_bytes.split_last() {
        mcu_bytes = rest;
    }
    let mcu_version = String::from_utf8_lossy(mcu_bytes).into_owned();

    Ok(DeviceInfo {
        target_id,
        se_version,
        flag,
        mcu_version,
        status,
        message: status.message(),
    })
}

fn parse_signature(payload: &[u8], status: StatusCode) -> SignResult {
    let mut message = status.message();

    // The device sends an ASCII diagnostic payload alongside these verdicts.
    // When it sends none, the plain status message is kept; there is no
    // dangling " : " separator.
    if matches!(
        status,
        StatusCode::DataInvalid | StatusCode::BadKeyHandle | StatusCode::SignVerifyError
    ) && !payload.is_empty()
    {
        message = format!("{message} : {}", String::from_utf8_lossy(payload));
    }

    let signature = if status.is_success() && !payload.is_empty() {
        Some(payload.to_vec())
    } else {
        None
    };

    SignResult {
        status,
        message,
        signature,
    }
}

/// Bounds-checked reader over a response payload.
struct Cursor<'a> {
    bytes: &'a [u8],
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    fn take_byte(&mut self) -> Result<u8, DecodeError> {
        let (&first, rest) = self.bytes.split_first().ok_or(DecodeError::PayloadTruncated)?;
        self.bytes = rest;
        Ok(first)
    }

    fn take_length_prefixed(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = self.take_byte()? as usize;
        if self.bytes.len() < len {
            return Err(DecodeError::PayloadTruncated);
        }
        let (field, rest) = self.bytes.split_at(len);
        self.bytes = rest;
        Ok(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_status(payload: &[u8], code: u16) -> Vec<u8> {
        let mut raw = payload.to_vec();
        raw.extend_from_slice(&code.to_be_bytes());
        raw
    }

    #[test]
    fn rejects_undersized_response() {
        assert_eq!(
            decode_signature(&[0x90]),
            Err(DecodeError::ResponseTooShort)
        );
    }

    #[test]
    fn signature_success_with_payload() {
        let raw = with_status(&[0xAA; 64], 0x9000);
        let result = decode_signature(&raw).unwrap();
        assert_eq!(result.status, StatusCode::Success);
        assert_eq!(result.message, "No errors");
        assert_eq!(result.signature.as_deref(), Some(&[0xAA; 64][..]));
    }

    #[test]
    fn signature_success_with_empty_payload_has_no_signature() {
        let result = decode_signature(&with_status(&[], 0x9000)).unwrap();
        assert_eq!(result.status, StatusCode::Success);
        assert_eq!(result.signature, None);
    }

    #[test]
    fn signature_error_never_carries_signature() {
        let result = decode_signature(&with_status(&[0x01, 0x02], 0x6985)).unwrap();
        assert_eq!(result.status, StatusCode::ConditionsNotSatisfied);
        assert_eq!(result.signature, None);
    }

    #[test]
    fn signature_verdicts_append_ascii_diagnostic() {
        let raw = with_status(b"bad field", 0x6984);
        let result = decode_signature(&raw).unwrap();
        assert_eq!(result.status, StatusCode::DataInvalid);
        assert_eq!(result.message, "Data is invalid : bad field");
        assert_eq!(result.signature, None);
    }

    #[test]
    fn signature_verdict_with_empty_payload_keeps_plain_message() {
        let result = decode_signature(&with_status(&[], 0x6984)).unwrap();
        assert_eq!(result.status, StatusCode::DataInvalid);
        assert_eq!(result.message, "Data is invalid");
    }

    #[test]
    fn address_splits_key_and_ascii_address() {
        let mut payload = vec![0x11; PK_LEN];
        payload.extend_from_slice(b"ALGOADDRESS");
        let raw = with_status(&payload, 0x9000);
        let addr = decode_address(&raw).unwrap();
        assert_eq!(addr.public_key, [0x11; PK_LEN]);
        assert_eq!(addr.address, "ALGOADDRESS");
        assert_eq!(addr.public_key_hex(), "11".repeat(PK_LEN));
    }

    #[test]
    fn version_fields() {
        let payload = [0x00, 1, 2, 3, 0x01, 0xDE, 0xAD, 0xBE, 0xEF];
        let version = decode_version(&with_status(&payload, 0x9000)).unwrap();
        assert!(!version.test_mode);
        assert_eq!((version.major, version.minor, version.patch), (1, 2, 3));
        assert!(version.device_locked);
        assert_eq!(version.target_id, "deadbeef");
    }

    #[test]
    fn app_info_parses_flags() {
        let mut payload = vec![1u8];
        payload.push(8);
        payload.extend_from_slice(b"Algorand");
        payload.push(5);
        payload.extend_from_slice(b"1.2.3");
        payload.push(1); // flag length
        payload.push(0x85); // recovery | onboarded | pin validated
        let info = decode_app_info(&with_status(&payload, 0x9000)).unwrap();
        assert_eq!(info.app_name, "Algorand");
        assert_eq!(info.app_version, "1.2.3");
        assert!(info.flag_recovery);
        assert!(!info.flag_signed_mcu_code);
        assert!(info.flag_onboarded);
        assert!(info.flag_pin_validated);
    }

    #[test]
    fn app_info_unknown_format_maps_to_device_busy() {
        let info = decode_app_info(&with_status(&[2, 0, 0], 0x9000)).unwrap();
        assert_eq!(info.status, StatusCode::DeviceBusy);
        assert_eq!(info.message, "response format ID not recognized");
    }

    #[test]
    fn device_info_dashboard_only_short_circuits() {
        let info = decode_device_info(&with_status(&[], 0x6e00)).unwrap();
        assert_eq!(info.status, StatusCode::AppNotOpen);
        assert_eq!(info.message, "This command is only available in the Dashboard");
    }

    #[test]
    fn device_info_trims_mcu_zero_terminator() {
        let mut payload = vec![0x33, 0x00, 0x00, 0x04];
        payload.push(3);
        payload.extend_from_slice(b"1.6");
        payload.push(2);
        payload.extend_from_slice(&[0xEE, 0x00]);
        payload.push(4);
        payload.extend_from_slice(b"3.1\0");
        let info = decode_device_info(&with_status(&payload, 0x9000)).unwrap();
        assert_eq!(info.target_id, "33000004");
        assert_eq!(info.se_version, "1.6");
        assert_eq!(info.flag, "ee00");
        assert_eq!(info.mcu_version, "3.1");
    }

    #[test]
    fn device_info_truncated_field_errors() {
        let mut payload = vec![0x33, 0x00, 0x00, 0x04];
        payload.push(9); // claims 9 bytes, none follow
        assert_eq!(
            decode_device_info(&with_status(&payload, 0x9000)),
            Err(DecodeError::PayloadTruncated)
        );
    }

    #[test]
    fn dispatch_entry_point_matches_typed_decoders() {
        let raw = with_status(&[0xAB; 8], 0x9000);
        let decoded = decode_response(&raw, ResponseKind::Signature).unwrap();
        assert_eq!(
            decoded,
            DecodedResponse::Signature(decode_signature(&raw).unwrap())
        );

        let raw = with_status(&[], 0x6e00);
        let decoded = decode_response(&raw, ResponseKind::DeviceInfo).unwrap();
        assert_eq!(
            decoded,
            DecodedResponse::DeviceInfo(decode_device_info(&raw).unwrap())
        );
    }
}
