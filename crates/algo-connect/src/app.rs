//! Public entry points for driving the signing app.

use tracing::debug;

use apdu_codec::apdu::{dashboard, ins, p1, p2};
use apdu_codec::response::{
    decode_address, decode_app_info, decode_device_info, decode_version,
};
use apdu_codec::{AddressResponse, ApduCommand, AppInfo, DeviceInfo, SignResult, VersionInfo};

use crate::arbitrary::{auth_to_sign, build_wire_message, decode_payload, parse_account_from_path};
use crate::channel::CommandChannel;
use crate::error::{ConnectError, ConnectResult};
use crate::group::{self, GroupSigningPlan, skipped_result};
use crate::session::SigningSession;
use crate::types::{SigningScope, StdSigData, StdSigDataResponse, StdSignMetadata};

const STATUS_OK: u16 = 0x9000;
const STATUS_DASHBOARD_ONLY: u16 = 0x6e00;

/// Host-side handle to the signing app behind a [`CommandChannel`].
///
/// All operations are strict request/response round trips; the handle never
/// has more than one command in flight. Device verdicts come back as data in
/// the returned results; [`ConnectError`] is reserved for precondition
/// violations and channel failures.
pub struct AlgorandApp<C> {
    channel: C,
}

impl<C> AlgorandApp<C>
where
    C: CommandChannel + Send,
{
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    /// Releases the underlying channel.
    pub fn into_inner(self) -> C {
        self.channel
    }

    /// Signing app version and device lock state.
    pub async fn get_version(&mut self) -> ConnectResult<VersionInfo> {
        let raw = self
            .channel
            .exchange(
                ApduCommand::new(ins::GET_VERSION, 0, 0, Vec::new()),
                Some(&[STATUS_OK]),
            )
            .await?;
        Ok(decode_version(&raw)?)
    }

    /// Metadata of whichever app is currently open on the device.
    pub async fn get_app_info(&mut self) -> ConnectResult<AppInfo> {
        let raw = self
            .channel
            .exchange(
                ApduCommand::with_cla(dashboard::CLA_APP_INFO, dashboard::INS_INFO, 0, 0, Vec::new()),
                Some(&[STATUS_OK]),
            )
            .await?;
        Ok(decode_app_info(&raw)?)
    }

    /// Firmware details; only answered from the dashboard.
    pub async fn get_device_info(&mut self) -> ConnectResult<DeviceInfo> {
        let raw = self
            .channel
            .exchange(
                ApduCommand::with_cla(
                    dashboard::CLA_DEVICE_INFO,
                    dashboard::INS_INFO,
                    0,
                    0,
                    Vec::new(),
                ),
                Some(&[STATUS_OK, STATUS_DASHBOARD_ONLY]),
            )
            .await?;
        Ok(decode_device_info(&raw)?)
    }

    /// Public key of `account_id`; optionally shown on the device for user
    /// confirmation.
    pub async fn get_public_key(
        &mut self,
        account_id: u32,
        require_confirmation: bool,
    ) -> ConnectResult<AddressResponse> {
        self.request_address(ins::GET_PUBLIC_KEY, account_id, require_confirmation)
            .await
    }

    /// Public key and encoded address of `account_id`; optionally shown on
    /// the device for user confirmation.
    pub async fn get_address_and_public_key(
        &mut self,
        account_id: u32,
        require_confirmation: bool,
    ) -> ConnectResult<AddressResponse> {
        self.request_address(ins::GET_ADDRESS, account_id, require_confirmation)
            .await
    }

    async fn request_address(
        &mut self,
        instruction: u8,
        account_id: u32,
        require_confirmation: bool,
    ) -> ConnectResult<AddressResponse> {
        let p1_value = if require_confirmation {
            p1::SHOW_ADDRESS_IN_DEVICE
        } else {
            p1::ONLY_RETRIEVE
        };
        let raw = self
            .channel
            .exchange(
                ApduCommand::new(
                    instruction,
                    p1_value,
                    p2::DEFAULT,
                    account_id.to_be_bytes().to_vec(),
                ),
                Some(&[STATUS_OK]),
            )
            .await?;
        Ok(decode_address(&raw)?)
    }

    /// Signs a single message (an encoded transaction) with `account_id`.
    ///
    /// A device rejection is a normal outcome carried in the returned
    /// [`SignResult`].
    pub async fn sign(&mut self, account_id: u32, message: &[u8]) -> ConnectResult<SignResult> {
        SigningSession::transaction(&mut self.channel)
            .run(account_id, message, None)
            .await
    }

    /// Signs a transaction group, skipping transactions whose sender is not
    /// the device key.
    ///
    /// Results mirror the input order exactly. Skipped transactions get a
    /// synthesized rejection without touching the device. A device failure on
    /// any signed transaction aborts the whole call with
    /// [`ConnectError::GroupSignAborted`]; earlier per-transaction successes
    /// are not surfaced through the error path.
    pub async fn sign_group(
        &mut self,
        account_id: u32,
        transactions: &[Vec<u8>],
    ) -> ConnectResult<Vec<SignResult>> {
        group::validate_group_size(transactions.len())?;

        let device_key = self.get_public_key(account_id, false).await?;
        let plan = GroupSigningPlan::build(transactions, &device_key.public_key_hex())?;
        let signable = plan.signable_count() as u8;

        let mut results = Vec::with_capacity(transactions.len());
        for (index, entry) in plan.entries().iter().enumerate() {
            if !entry.should_sign {
                results.push(skipped_result());
                continue;
            }

            debug!(index, "signing group transaction");
            let result = SigningSession::transaction(&mut self.channel)
                .run(account_id, entry.txn, Some(signable))
                .await?;
            if !result.status.is_success() {
                return Err(ConnectError::GroupSignAborted {
                    index,
                    status: result.status.as_u16(),
                    message: result.message,
                });
            }
            results.push(result);
        }

        Ok(results)
    }

    /// Signs structured arbitrary data under the declared scope.
    pub async fn sign_data(
        &mut self,
        request: StdSigData,
        metadata: &StdSignMetadata,
    ) -> ConnectResult<StdSigDataResponse> {
        let account_id = match request.hd_path.as_deref() {
            Some(path) => parse_account_from_path(path)?,
            None => 0,
        };
        let device_key = self.get_public_key(account_id, false).await?;
        if request.signer.is_empty() || request.signer[..] != device_key.public_key[..] {
            return Err(ConnectError::SignerMismatch);
        }

        let decoded = decode_payload(&request.data, metadata.encoding)?;

        let (to_sign, domain) = match metadata.scope {
            SigningScope::Auth => {
                let to_sign = auth_to_sign(&request, &decoded)?;
                let domain = request
                    .domain
                    .clone()
                    .ok_or(ConnectError::MissingDomain)?;
                (to_sign, domain)
            }
        };

        let message = build_wire_message(&to_sign, &domain, &decoded);
        let result = SigningSession::arbitrary(&mut self.channel)
            .run(0, &message, None)
            .await?;

        Ok(StdSigDataResponse {
            request,
            status: result.status,
            message: result.message,
            signature: result.signature,
        })
    }
}
