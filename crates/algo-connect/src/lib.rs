//! Host-side driver for the Algorand hardware signing app.
//!
//! The device is reached through a caller-supplied [`CommandChannel`]; this
//! crate owns everything above it: chunked signing sessions, the
//! group-signing policy, and the structured arbitrary-data (auth) signing
//! flow. Device-reported outcomes (including rejections) are returned as data
//! in [`SignResult`]-style values; only precondition violations and channel
//! failures surface as [`ConnectError`].
//!
//! The device processes one command at a time. Callers running several
//! top-level operations concurrently against one device must serialize them
//! at the transport; this crate issues strictly sequential round trips within
//! a call but provides no cross-call mutual exclusion.

pub mod app;
pub mod arbitrary;
pub mod channel;
pub mod error;
pub mod group;
mod session;
pub mod txn;
pub mod types;

pub use apdu_codec::{
    AddressResponse, AppInfo, DeviceInfo, SignResult, StatusCode, VersionInfo,
};
pub use app::AlgorandApp;
pub use channel::{ChannelError, CommandChannel};
pub use error::{ConnectError, ConnectResult};
pub use types::{DataEncoding, SigningScope, StdSigData, StdSigDataResponse, StdSignMetadata};
