//! Device status codes.
//!
//! Every response from the device ends with a 16-bit big-endian status word.
//! The known values below are a wire contract; anything else maps to
//! [`StatusCode::Unknown`] instead of failing, so decoding a response never
//! errors on an unrecognized status.

/// The closed set of status words the device is known to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Success,
    DeviceBusy,
    ExecutionError,
    WrongLength,
    EmptyBuffer,
    OutputBufferTooSmall,
    DataInvalid,
    ConditionsNotSatisfied,
    TransactionRejected,
    BadKeyHandle,
    InvalidP1P2,
    InsNotSupported,
    AppNotOpen,
    UnknownError,
    SignVerifyError,
    Unknown(u16),
}

impl StatusCode {
    pub fn from_u16(code: u16) -> Self {
        match code {
            0x9000 => Self::Success,
            0x9001 => Self::DeviceBusy,
            0x6400 => Self::ExecutionError,
            0x6700 => Self::WrongLength,
            0x6982 => Self::EmptyBuffer,
            0x6983 => Self::OutputBufferTooSmall,
            0x6984 => Self::DataInvalid,
            0x6985 => Self::ConditionsNotSatisfied,
            0x6986 => Self::TransactionRejected,
            0x6a80 => Self::BadKeyHandle,
            0x6b00 => Self::InvalidP1P2,
            0x6d00 => Self::InsNotSupported,
            0x6e00 => Self::AppNotOpen,
            0x6f00 => Self::UnknownError,
            0x6f01 => Self::SignVerifyError,
            other => Self::Unknown(other),
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            Self::Success => 0x9000,
            Self::DeviceBusy => 0x9001,
            Self::ExecutionError => 0x6400,
            Self::WrongLength => 0x6700,
            Self::EmptyBuffer => 0x6982,
            Self::OutputBufferTooSmall => 0x6983,
            Self::DataInvalid => 0x6984,
            Self::ConditionsNotSatisfied => 0x6985,
            Self::TransactionRejected => 0x6986,
            Self::BadKeyHandle => 0x6a80,
            Self::InvalidP1P2 => 0x6b00,
            Self::InsNotSupported => 0x6d00,
            Self::AppNotOpen => 0x6e00,
            Self::UnknownError => 0x6f00,
            Self::SignVerifyError => 0x6f01,
            Self::Unknown(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// Fixed human-readable message for this status.
    pub fn message(self) -> String {
        match self {
            Self::Success => "No errors".to_owned(),
            Self::DeviceBusy => "Device is busy".to_owned(),
            Self::ExecutionError => "Execution Error".to_owned(),
            Self::WrongLength => "Wrong Length".to_owned(),
            Self::EmptyBuffer => "Empty Buffer".to_owned(),
            Self::OutputBufferTooSmall => "Output buffer too small".to_owned(),
            Self::DataInvalid => "Data is invalid".to_owned(),
            Self::ConditionsNotSatisfied => "Conditions not satisfied".to_owned(),
            Self::TransactionRejected => "Transaction rejected".to_owned(),
            Self::BadKeyHandle => "Bad key handle".to_owned(),
            Self::InvalidP1P2 => "Invalid P1/P2".to_owned(),
            Self::InsNotSupported => "Instruction not supported".to_owned(),
            Self::AppNotOpen => "Algorand app does not seem to be open".to_owned(),
            Self::UnknownError => "Unknown error".to_owned(),
            Self::SignVerifyError => "Sign/verify error".to_owned(),
            Self::Unknown(code) => format!("Unknown Return Code: 0x{code:04X}"),
        }
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self::from_u16(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_roundtrip() {
        for code in [
            0x9000, 0x9001, 0x6400, 0x6700, 0x6982, 0x6983, 0x6984, 0x6985, 0x6986, 0x6a80,
            0x6b00, 0x6d00, 0x6e00, 0x6f00, 0x6f01,
        ] {
            let status = StatusCode::from_u16(code);
            assert!(!matches!(status, StatusCode::Unknown(_)), "0x{code:04x}");
            assert_eq!(status.as_u16(), code);
        }
    }

    #[test]
    fn unknown_code_formats_message() {
        let status = StatusCode::from_u16(0x1234);
        assert_eq!(status, StatusCode::Unknown(0x1234));
        assert_eq!(status.message(), "Unknown Return Code: 0x1234");
        assert_eq!(status.as_u16(), 0x1234);
    }

    #[test]
    fn success_message() {
        assert_eq!(StatusCode::Success.message(), "No errors");
        assert!(StatusCode::Success.is_success());
        assert!(!StatusCode::DeviceBusy.is_success());
    }
}
