//! # Ledger Error Taxonomy
//!
//! Every failure in the ledger is an atomic abort: no partial state survives
//! a failed operation, and every error surfaces synchronously to the caller
//! with a machine-distinguishable kind plus a readable reason. Nothing is
//! silently swallowed or retried — this is a transactional failure model,
//! not a retry/backoff one.

use crate::account::Account;
use crate::asset::AssetId;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The transfer destination is the null account.
    #[error("invalid destination: the null account cannot receive assets")]
    InvalidDestination,

    /// The caller is neither the asset source nor an approved operator,
    /// or a self-approval was attempted.
    #[error("unauthorized: {reason}")]
    Unauthorized {
        /// What exactly was not allowed.
        reason: String,
    },

    /// A fungible debit exceeds the available balance. Underflow is a hard
    /// failure, never wraparound.
    #[error(
        "insufficient balance: {account} holds {available} of {asset}, requested {requested}"
    )]
    InsufficientBalance {
        /// The asset being debited.
        asset: AssetId,
        /// The account being debited.
        account: Account,
        /// The balance actually held.
        available: u64,
        /// The amount that was requested.
        requested: u64,
    },

    /// A non-fungible transfer where the claimed source is not the
    /// recorded owner.
    #[error("ownership mismatch: {asset} is owned by {owner}, not {claimed}")]
    OwnershipMismatch {
        /// The non-fungible asset in question.
        asset: AssetId,
        /// The account the caller claimed owns it.
        claimed: Account,
        /// The account that actually owns it.
        owner: Account,
    },

    /// Parallel-array inputs differ in length.
    #[error("array length mismatch: {left} against {right}")]
    ArrayLengthMismatch {
        /// Length of the first array.
        left: usize,
        /// Length of the second array.
        right: usize,
    },

    /// A mint targeted an id already registered, in either asset class.
    #[error("asset already exists: {0}")]
    AlreadyExists(AssetId),

    /// A lookup referenced an asset id that does not exist.
    #[error("asset not found: {0}")]
    NotFound(AssetId),

    /// The acceptance-check callback refused the transfer or returned a
    /// non-matching acknowledgement token.
    #[error("recipient rejected the transfer: {reason}")]
    RecipientRejected {
        /// Why the recipient said no.
        reason: String,
    },

    /// The recipient is programmable but does not implement the receiver
    /// protocol.
    #[error("recipient does not implement the receiver protocol")]
    RecipientProtocolUnsupported,

    /// A credit would overflow `u64`.
    ///
    /// If you're hitting this, someone is trying to hold more than
    /// 18.4 quintillion units. That's either a bug or an attack.
    #[error("balance overflow: crediting {amount} to {account} would exceed u64::MAX")]
    Overflow {
        /// The account being credited.
        account: Account,
        /// The amount that caused the overflow.
        amount: u64,
    },

    /// A mutating operation was invoked while another one was still in
    /// progress (a program hook trying to reenter the ledger).
    #[error("reentrant call: a ledger operation is already in progress")]
    ReentrantCall,
}
