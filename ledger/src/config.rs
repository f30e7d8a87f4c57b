//! # Ledger Configuration & Constants
//!
//! Every magic number of the ledger lives here. If you're hardcoding a
//! constant somewhere else, you're doing it wrong and you owe the team
//! coffee.
//!
//! The base asset id in particular is load-bearing: the escrow marketplace
//! denominates every price and every custodial hold in it. Changing it
//! after anything has been minted would strand balances, so don't.

use crate::asset::AssetId;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Major version — bump on breaking ledger-semantics changes.
pub const PROTOCOL_VERSION_MAJOR: u16 = 0;

/// Minor version — bump on backward-compatible additions.
pub const PROTOCOL_VERSION_MINOR: u16 = 1;

/// The full version string, assembled at compile time because allocating
/// for something this trivial at runtime would be embarrassing.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Base Asset
// ---------------------------------------------------------------------------

/// The well-known fungible asset that serves as the unit of account.
///
/// A fixed id, not a derived one: "VELA" in ASCII followed by zeroes. Yes,
/// we're that cute. Everything the marketplace prices, holds, or pays out
/// is a quantity of this asset.
pub const BASE_ASSET: AssetId = AssetId::from_bytes([
    0x56, 0x45, 0x4C, 0x41, // "VELA"
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0, 0, 0, 0,
]);
