//! Group-signing policy: which transactions the device signs, decided once
//! up front.

use tracing::debug;

use apdu_codec::{SignResult, StatusCode};

use crate::error::{ConnectError, ConnectResult};
use crate::txn::extract_sender_hex;

pub const MIN_GROUP_SIZE: usize = 2;
pub const MAX_GROUP_SIZE: usize = 16;

/// Group-shape preconditions, checked before any device I/O (including the
/// public-key round trip that precedes plan construction).
pub fn validate_group_size(len: usize) -> ConnectResult<()> {
    match len {
        0 => Err(ConnectError::EmptyGroup),
        1 => Err(ConnectError::SingleTransactionGroup),
        n if n > MAX_GROUP_SIZE => Err(ConnectError::GroupTooLarge(n)),
        _ => Ok(()),
    }
}

/// One transaction in a group and whether the device is to sign it.
#[derive(Debug, Clone, Copy)]
pub struct PlanEntry<'a> {
    pub txn: &'a [u8],
    pub should_sign: bool,
}

/// Immutable per-group signing plan, built once before any signing command
/// and consumed read-only by the signing loop. Entry order mirrors the input
/// transaction order exactly.
#[derive(Debug)]
pub struct GroupSigningPlan<'a> {
    entries: Vec<PlanEntry<'a>>,
    signable: usize,
}

impl<'a> GroupSigningPlan<'a> {
    /// Validates group shape and marks each transaction whose sender equals
    /// the device public key (hex comparison).
    ///
    /// Fails before any further device I/O on an empty group, a single
    /// transaction, more than [`MAX_GROUP_SIZE`] transactions, a transaction
    /// that does not decode, or a group in which nothing is device-signed.
    pub fn build(transactions: &'a [Vec<u8>], device_key_hex: &str) -> ConnectResult<Self> {
        validate_group_size(transactions.len())?;

        let mut entries = Vec::with_capacity(transactions.len());
        let mut signable = 0;
        for (index, txn) in transactions.iter().enumerate() {
            let sender = extract_sender_hex(txn)?;
            let should_sign = sender == device_key_hex;
            if should_sign {
                signable += 1;
            } else {
                debug!(index, "skipping transaction with foreign sender");
            }
            entries.push(PlanEntry {
                txn: txn.as_slice(),
                should_sign,
            });
        }

        if signable == 0 {
            return Err(ConnectError::NoSignableTransactions);
        }

        debug!(
            total = entries.len(),
            signable, "built group signing plan"
        );
        Ok(Self { entries, signable })
    }

    /// Count of transactions the device will sign; embedded into the first
    /// chunk of every signed transaction in the group.
    pub fn signable_count(&self) -> usize {
        self.signable
    }

    pub fn entries(&self) -> &[PlanEntry<'a>] {
        &self.entries
    }
}

/// Result synthesized for a transaction skipped by the plan; the device is
/// never contacted for these.
pub(crate) fn skipped_result() -> SignResult {
    SignResult {
        status: StatusCode::ConditionsNotSatisfied,
        message: "sender mismatch".to_owned(),
        signature: None,
    }
}
