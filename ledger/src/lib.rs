// Copyright (c) 2026 Vela Systems. MIT License.
// See LICENSE for details.

//! # VELA Ledger — Unified Asset Ledger
//!
//! One identifier space, two kinds of assets. Fungible classes behave like
//! account balances: quantities that split, merge, and conserve their total
//! supply. Non-fungible instances behave like deeds: exactly one owner at
//! all times, tracked in an authoritative owner index. Both live under the
//! same 256-bit [`asset::AssetId`] space and move through the same transfer
//! engine, which branches per id.
//!
//! The ledger is a purely in-memory state machine. The host environment
//! executes every operation as an indivisible, serialized unit and owns
//! transport, persistence, and identity — the engineering problem here is
//! making each operation correct as a single atomic step, including the
//! synchronous recipient callback.
//!
//! ## Modules
//!
//! - **account** — Opaque account identities and the null sentinel.
//! - **asset** — 256-bit asset ids with deterministic BLAKE3 derivation.
//! - **store** — Balance store, fungible supply index, non-fungible owner
//!   index.
//! - **receiver** — The acceptance-check protocol programmable recipients
//!   implement.
//! - **ledger** — The transfer engine: single/batch transfer, operator
//!   approvals, gated issuance, rollback, reentrancy guard.
//! - **events** — Append-only observable notifications.
//! - **error** — The failure taxonomy. Every failure is an atomic abort.
//! - **config** — Protocol constants, including the well-known base asset.
//!
//! ## Design Philosophy
//!
//! 1. Effects before interaction: mutate, record, then call out — and
//!    unwind completely if the callout says no.
//! 2. State transitions are explicit: enum variants, not boolean flags.
//! 3. All monetary arithmetic is checked. Wrapping arithmetic and money do
//!    not mix.
//! 4. If it touches balances, it has tests. Plural.

pub mod account;
pub mod asset;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod receiver;
pub mod store;

pub use account::Account;
pub use asset::AssetId;
pub use error::LedgerError;
pub use events::LedgerEvent;
pub use ledger::Ledger;
