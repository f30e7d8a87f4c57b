//! # Marketplace Error Taxonomy
//!
//! Market-level failures layered over the ledger's. Ledger errors pass
//! through transparently via `#[from]`; everything else is a marketplace
//! policy precondition (zero price, credit minimum, wrong caller, closed
//! order, resold offer), each as its own machine-distinguishable variant
//! with a readable reason. As in the ledger, every failure is an atomic
//! abort.

use thiserror::Error;
use vela_ledger::{Account, AssetId, LedgerError};

use crate::escrow::OrderStatus;

/// Errors that can occur during escrow marketplace operations.
#[derive(Debug, Error)]
pub enum MarketError {
    /// A ledger operation failed underneath the marketplace.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The referenced offer does not exist.
    #[error("offer not found: {0}")]
    OfferNotFound(AssetId),

    /// The referenced order does not exist.
    #[error("order not found: {0}")]
    OrderNotFound(AssetId),

    /// Offers must carry a positive price.
    #[error("offer price must be positive")]
    ZeroPrice,

    /// The payment converts to too little of the base asset.
    #[error(
        "insufficient credit: payment {payment} converts to {credited}, \
         which is not strictly greater than 1 base unit"
    )]
    InsufficientCredit {
        /// The native-value payment that was offered.
        payment: u64,
        /// What it would have converted to.
        credited: u64,
    },

    /// Only the order's buyer may settle or complain.
    #[error("wrong caller: {caller} is not the buyer of order {order}")]
    WrongCaller {
        /// The order in question.
        order: AssetId,
        /// The account that tried to act on it.
        caller: Account,
    },

    /// The offer's representative asset has left its original seller, so it
    /// no longer accepts orders.
    #[error("offer {offer} has been resold and no longer accepts orders")]
    OfferResold {
        /// The offer in question.
        offer: AssetId,
    },

    /// The order has already reached a terminal state.
    #[error("order {order} is already {status}")]
    OrderClosed {
        /// The order in question.
        order: AssetId,
        /// Its terminal status.
        status: OrderStatus,
    },

    /// Settlement needs the operator approval granted at listing time,
    /// and the seller has revoked it. The buyer can still complain for a
    /// refund.
    #[error("settlement blocked: {seller} has revoked the custodial operator approval")]
    ApprovalRevoked {
        /// The seller whose approval is missing.
        seller: Account,
    },

    /// Converting the payment to base units would overflow.
    #[error("conversion overflow for payment {payment}")]
    ConversionOverflow {
        /// The native-value payment that was offered.
        payment: u64,
    },
}
