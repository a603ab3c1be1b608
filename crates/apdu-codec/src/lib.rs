//! Wire-level building blocks for talking to the Algorand signing device.
//!
//! This crate knows nothing about transports or orchestration: it owns the
//! APDU constants, payload chunking, the device status-code table and the
//! per-command response parsers. Everything here is pure and synchronous.

pub mod apdu;
pub mod chunk;
pub mod response;
pub mod status;

pub use apdu::{ApduCommand, CHUNK_SIZE, CLA, PK_LEN};
pub use chunk::prepare_chunks;
pub use response::{
    AddressResponse, AppInfo, DecodeError, DecodedResponse, DeviceInfo, ResponseKind, SignResult,
    VersionInfo, decode_response,
};
pub use status::StatusCode;
