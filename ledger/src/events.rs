//! # Observable Notifications
//!
//! Every successful mutation emits exactly one event into an append-only
//! in-memory log: a single transfer emits [`LedgerEvent::TransferSingle`],
//! a batch emits one aggregate [`LedgerEvent::TransferBatch`] covering all
//! pairs in input order, and an approval change emits
//! [`LedgerEvent::ApprovalForAll`]. Mints are transfers whose `from` is the
//! null account.
//!
//! Events are appended *before* the recipient acceptance check runs, so a
//! rejected transfer must take its event back out again — rollback truncates
//! the log to its pre-operation length. Observers therefore never see an
//! event for a mutation that didn't stick.

use crate::account::Account;
use crate::asset::AssetId;
use serde::{Deserialize, Serialize};

/// A single externally observable ledger notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// One asset moved between two accounts (or was minted, if `from` is
    /// the null account).
    TransferSingle {
        /// The caller that initiated the operation.
        operator: Account,
        /// The debited account.
        from: Account,
        /// The credited account.
        to: Account,
        /// The asset that moved.
        asset: AssetId,
        /// The quantity that moved.
        amount: u64,
    },

    /// Several assets moved between the same two accounts in one atomic
    /// operation. `assets` and `amounts` are parallel and preserve the
    /// caller's input order.
    TransferBatch {
        /// The caller that initiated the operation.
        operator: Account,
        /// The debited account.
        from: Account,
        /// The credited account.
        to: Account,
        /// The assets that moved, in input order.
        assets: Vec<AssetId>,
        /// The quantities that moved, parallel to `assets`.
        amounts: Vec<u64>,
    },

    /// An owner granted or revoked blanket operator rights.
    ApprovalForAll {
        /// The account granting or revoking.
        owner: Account,
        /// The operator affected.
        operator: Account,
        /// `true` for grant, `false` for revoke.
        approved: bool,
    },
}

/// Append-only log of ledger events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// All events recorded so far, oldest first.
    pub fn all(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drops every event recorded after `len`. Used by rollback so that a
    /// failed operation leaves no notification behind.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.events.truncate(len);
    }
}
