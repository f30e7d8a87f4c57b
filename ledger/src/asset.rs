//! # Asset Identifiers
//!
//! Every asset in VELA — fungible classes and non-fungible instances alike —
//! lives in a single 256-bit identifier space. Fungible class ids are
//! application-chosen; non-fungible ids are deterministic BLAKE3 hashes of
//! the asset's defining attributes, derived through [`AssetId::derive`].
//!
//! Deterministic derivation means the same attributes always produce the
//! same id, no matter when or where it is computed — no registry needed, no
//! coordination required. It also means that creating a second asset with
//! identical defining attributes collides with the issuance existence check
//! and fails, which is exactly the uniqueness guarantee the marketplace
//! leans on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit asset identifier.
///
/// Shared by fungible asset classes and non-fungible instances. Which class
/// a given id belongs to is recorded by the ledger at mint time; an id is
/// never both.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId([u8; 32]);

impl AssetId {
    /// Creates an `AssetId` from raw 32-byte content.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 32-byte identifier.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the hex-encoded identifier.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parses a hex-encoded identifier.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Derives an `AssetId` from a domain tag and the asset's defining parts.
    ///
    /// The hash input is the tag followed by each part, every element
    /// prefixed with a `0x00` separator. The separators prevent ambiguity
    /// when one part's suffix matches the next part's prefix, and the tag
    /// keeps ids from different domains (offers, orders, ...) from ever
    /// colliding even on identical parts.
    ///
    /// The derivation is pure: callers (and tests) can pre-compute expected
    /// ids without touching any ledger state.
    pub fn derive(tag: &str, parts: &[&[u8]]) -> Self {
        let mut preimage = Vec::with_capacity(
            tag.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>(),
        );
        preimage.extend_from_slice(tag.as_bytes());
        for part in parts {
            preimage.push(0x00);
            preimage.extend_from_slice(part);
        }
        Self(*blake3::hash(&preimage).as_bytes())
    }
}

impl fmt::Debug for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AssetId({}...)", &self.to_hex()[..12])
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
