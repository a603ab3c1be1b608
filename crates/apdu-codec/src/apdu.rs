//! APDU constants for the Algorand signing app.
//!
//! These values are a stable wire contract shared with the device firmware;
//! changing any of them breaks compatibility with deployed apps.

/// Application class byte for every command sent to the signing app.
pub const CLA: u8 = 0x80;

/// Length of an ed25519 public key in address responses.
pub const PK_LEN: usize = 32;

/// Maximum payload bytes per signing chunk.
pub const CHUNK_SIZE: usize = 250;

/// Instruction bytes understood by the signing app.
pub mod ins {
    pub const GET_VERSION: u8 = 0x00;
    pub const GET_PUBLIC_KEY: u8 = 0x03;
    pub const GET_ADDRESS: u8 = 0x04;
    pub const SIGN_MSGPACK: u8 = 0x08;
    pub const SIGN_ARBITRARY: u8 = 0x10;
}

/// Dashboard (bootloader) commands live under their own class bytes and are
/// answered by the device OS rather than the signing app.
pub mod dashboard {
    pub const CLA_APP_INFO: u8 = 0xb0;
    pub const CLA_DEVICE_INFO: u8 = 0xe0;
    pub const INS_INFO: u8 = 0x01;
}

/// P1 values. For signing instructions P1 carries the chunk role; the group
/// transaction count is OR-ed in shifted left by one so it never collides
/// with `FIRST_ACCOUNT_ID` or `CONTINUATION`.
pub mod p1 {
    pub const ONLY_RETRIEVE: u8 = 0x00;
    pub const SHOW_ADDRESS_IN_DEVICE: u8 = 0x01;

    pub const FIRST: u8 = 0x00;
    pub const FIRST_ACCOUNT_ID: u8 = 0x01;
    pub const CONTINUATION: u8 = 0x80;
}

/// P2 values. The last chunk of a signing sequence is flagged here.
pub mod p2 {
    pub const DEFAULT: u8 = 0x00;

    pub const LAST: u8 = 0x00;
    pub const CONTINUATION: u8 = 0x80;
}

/// A single command/response unit on the device channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduCommand {
    pub cla: u8,
    pub ins: u8,
    pub p1: u8,
    pub p2: u8,
    pub data: Vec<u8>,
}

impl ApduCommand {
    /// Command under the signing app's class byte.
    pub fn new(ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self::with_cla(CLA, ins, p1, p2, data)
    }

    pub fn with_cla(cla: u8, ins: u8, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self {
            cla,
            ins,
            p1,
            p2,
            data,
        }
    }
}
