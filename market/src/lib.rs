//! # VELA Marketplace
//!
//! The escrow marketplace on top of the VELA ledger. Sellers list offers,
//! buyers fund orders, and the engine holds the money in the middle until
//! the buyer decides how it ends:
//!
//! - **Escrow Engine** — credit purchase, offer listing, order placement
//!   with custodial holds, and buyer-driven settlement (complete or
//!   complain).
//! - **Deterministic ids** — offers and orders are non-fungible ledger
//!   assets whose ids derive purely from their defining attributes, so
//!   uniqueness is enforced by the ledger's issuance existence check rather
//!   than by marketplace bookkeeping.
//!
//! ## Design Principles
//!
//! 1. The ledger is the source of truth. The engine's tables record
//!    metadata; ownership, balances, and uniqueness live in the ledger.
//! 2. State transitions are explicit: enum variants, not boolean flags.
//! 3. Settlement is all-or-nothing — the custodial hold is exactly the
//!    order's amount until a terminal state, never partially released.

pub mod error;
pub mod escrow;

pub use error::MarketError;
pub use escrow::{EscrowEngine, Offer, Order, OrderStatus};
