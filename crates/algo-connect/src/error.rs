use thiserror::Error;

use apdu_codec::DecodeError;

use crate::channel::ChannelError;

/// Fatal failures of a host-side operation.
///
/// Device verdicts (rejection, invalid data, and so on) are not errors; they
/// come back as data in the operation's result. Every variant here either
/// violates a precondition before any device I/O, or aborts the call once
/// I/O has started.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("no transactions to sign")]
    EmptyGroup,
    #[error("single transaction in group")]
    SingleTransactionGroup,
    #[error("too many transactions in group: {0} (maximum 16)")]
    GroupTooLarge(usize),
    #[error("no transactions were meant to be signed by the device")]
    NoSignableTransactions,
    #[error("group signing aborted at transaction {index}: {message}")]
    GroupSignAborted {
        index: usize,
        status: u16,
        message: String,
    },
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),
    #[error("declared signer does not match the device public key")]
    SignerMismatch,
    #[error("unsupported data encoding")]
    UnsupportedEncoding,
    #[error("payload does not decode under the declared encoding")]
    MalformedPayload,
    #[error("unsupported signing scope")]
    UnsupportedScope,
    #[error("signing data is not valid JSON")]
    MalformedJson,
    #[error("missing domain")]
    MissingDomain,
    #[error("missing authentication data")]
    MissingAuthenticationData,
    #[error("authentication data does not commit to the domain")]
    DomainAuthenticationFailed,
    #[error("malformed hierarchical key path: {0}")]
    MalformedKeyPath(String),
    #[error("response decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),
}

pub type ConnectResult<T> = std::result::Result<T, ConnectError>;
