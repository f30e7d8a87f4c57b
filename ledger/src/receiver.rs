//! # Acceptance-Check Protocol
//!
//! A programmable recipient gets a say in whether it accepts an incoming
//! transfer. After the ledger mutates balances and records the event, it
//! invokes the recipient's [`Program`] hook — [`Program::on_single_received`]
//! for single transfers, [`Program::on_batch_received`] for batches — and
//! requires the hook to return the matching acknowledgement token. Anything
//! else rolls the whole operation back.
//!
//! The tokens are computed from the hooks' own signature strings (first
//! four bytes of the BLAKE3 hash), so a program cannot accidentally return
//! the right value without implementing the protocol on purpose.
//!
//! A hook receives `&mut Ledger` and may call back into it. Reads work;
//! mutating calls fail with [`crate::error::LedgerError::ReentrantCall`]
//! because the outer operation is still in progress (see the guard in
//! [`crate::ledger::Ledger`]).

use crate::account::Account;
use crate::asset::AssetId;
use crate::ledger::Ledger;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Acknowledgement tokens
// ---------------------------------------------------------------------------

/// Canonical signature of the single-transfer hook. The single-transfer
/// acknowledgement token is derived from this string.
pub const SINGLE_RECEIVED_SIGNATURE: &str =
    "on_single_received(operator,from,asset,amount,data)";

/// Canonical signature of the batch-transfer hook.
pub const BATCH_RECEIVED_SIGNATURE: &str =
    "on_batch_received(operator,from,assets,amounts,data)";

/// A four-byte capability-acknowledgment token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AckToken([u8; 4]);

impl AckToken {
    /// The token a program must return from
    /// [`Program::on_single_received`] to accept a single transfer.
    pub fn single() -> Self {
        Self::from_signature(SINGLE_RECEIVED_SIGNATURE)
    }

    /// The token a program must return from
    /// [`Program::on_batch_received`] to accept a batch transfer.
    pub fn batch() -> Self {
        Self::from_signature(BATCH_RECEIVED_SIGNATURE)
    }

    fn from_signature(signature: &str) -> Self {
        let hash = blake3::hash(signature.as_bytes());
        let mut token = [0u8; 4];
        token.copy_from_slice(&hash.as_bytes()[..4]);
        Self(token)
    }
}

impl fmt::Debug for AckToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AckToken(0x{})", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// Program trait
// ---------------------------------------------------------------------------

/// What a program hook says about an incoming transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The program acknowledges the transfer. The operation stands only if
    /// the token matches the hook's expected token.
    Ack(AckToken),
    /// The program explicitly refuses the transfer, with a reason.
    Refuse(String),
    /// The program does not implement this hook.
    Unsupported,
}

/// The single transfer a program is being asked to accept.
#[derive(Debug)]
pub struct IncomingTransfer<'a> {
    /// The caller that initiated the transfer.
    pub operator: &'a Account,
    /// The debited account (null for mints).
    pub from: &'a Account,
    /// The asset that moved.
    pub asset: AssetId,
    /// The quantity that moved.
    pub amount: u64,
    /// Opaque payload forwarded verbatim from the transfer call.
    pub data: &'a [u8],
}

/// The batch transfer a program is being asked to accept. `assets` and
/// `amounts` are parallel, in the original input order.
#[derive(Debug)]
pub struct IncomingBatch<'a> {
    /// The caller that initiated the transfer.
    pub operator: &'a Account,
    /// The debited account (null for mints).
    pub from: &'a Account,
    /// The assets that moved, in input order.
    pub assets: &'a [AssetId],
    /// The quantities that moved, parallel to `assets`.
    pub amounts: &'a [u64],
    /// Opaque payload forwarded verbatim from the transfer call.
    pub data: &'a [u8],
}

/// A programmable account's callback contract.
///
/// Both hooks default to [`Response::Unsupported`], which the ledger treats
/// as "this recipient does not implement the protocol" and rolls back. A
/// program that wants to receive assets overrides the relevant hook and
/// returns the matching token.
pub trait Program {
    /// Called after a single transfer credited this account. The ledger
    /// state already reflects the transfer; returning anything but the
    /// matching [`AckToken::single`] unwinds it.
    fn on_single_received(
        &mut self,
        ledger: &mut Ledger,
        incoming: &IncomingTransfer<'_>,
    ) -> Response {
        let _ = (ledger, incoming);
        Response::Unsupported
    }

    /// Called once, after all pairs of a batch transfer credited this
    /// account. Returning anything but the matching [`AckToken::batch`]
    /// unwinds the entire batch.
    fn on_batch_received(
        &mut self,
        ledger: &mut Ledger,
        incoming: &IncomingBatch<'_>,
    ) -> Response {
        let _ = (ledger, incoming);
        Response::Unsupported
    }
}
