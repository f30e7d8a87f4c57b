//! # Ledger State — Balances, Supply, Ownership
//!
//! The three foundational maps behind the ledger:
//!
//! - [`BalanceStore`] — quantity of asset held per (asset, account). The raw
//!   numbers, nothing more.
//! - [`SupplyIndex`] — total minted quantity per fungible asset. A positive
//!   supply is the existence test for a fungible id.
//! - [`OwnerIndex`] — the authoritative owner per non-fungible asset, as a
//!   bidirectional structure: a map for O(1) membership and lookup, plus an
//!   insertion-order vector for O(1) append and in-order enumeration.
//!   Membership doubles as "does this non-fungible asset exist".
//!
//! None of these enforce transfer semantics on their own — authorization,
//! underflow checks, and the fungible/non-fungible branch all live in
//! [`crate::ledger::Ledger`], which is the only writer.

use crate::account::Account;
use crate::asset::AssetId;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// BalanceStore
// ---------------------------------------------------------------------------

/// Quantity of each asset held by each account: `asset -> (account -> u64)`.
///
/// Absent entries read as zero — a nonexistent asset has the implicit
/// balance 0 everywhere.
#[derive(Debug, Clone, Default)]
pub struct BalanceStore {
    balances: HashMap<AssetId, HashMap<Account, u64>>,
}

impl BalanceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `account` for `asset`, defaulting to 0.
    pub fn get(&self, asset: &AssetId, account: &Account) -> u64 {
        self.balances
            .get(asset)
            .and_then(|per_account| per_account.get(account))
            .copied()
            .unwrap_or(0)
    }

    /// Overwrites the balance of `account` for `asset`.
    pub fn set(&mut self, asset: AssetId, account: &Account, amount: u64) {
        self.balances
            .entry(asset)
            .or_default()
            .insert(account.clone(), amount);
    }
}

// ---------------------------------------------------------------------------
// SupplyIndex
// ---------------------------------------------------------------------------

/// Total minted quantity per fungible asset.
#[derive(Debug, Clone, Default)]
pub struct SupplyIndex {
    supply: HashMap<AssetId, u64>,
}

impl SupplyIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total supply of `asset`, defaulting to 0.
    pub fn get(&self, asset: &AssetId) -> u64 {
        self.supply.get(asset).copied().unwrap_or(0)
    }

    /// Overwrites the total supply of `asset`.
    pub fn set(&mut self, asset: AssetId, amount: u64) {
        self.supply.insert(asset, amount);
    }
}

// ---------------------------------------------------------------------------
// OwnerIndex
// ---------------------------------------------------------------------------

/// Enumerable owner index for non-fungible assets.
///
/// `owners` answers membership and lookup in O(1); `order` preserves mint
/// order for enumeration. Ids are never removed in normal operation — this
/// ledger does not burn — so `remove` exists solely for unwinding a mint
/// whose acceptance check failed.
#[derive(Debug, Clone, Default)]
pub struct OwnerIndex {
    owners: HashMap<AssetId, Account>,
    order: Vec<AssetId>,
}

impl OwnerIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `asset` is registered as non-fungible.
    pub fn contains(&self, asset: &AssetId) -> bool {
        self.owners.contains_key(asset)
    }

    /// Returns the current owner of `asset`, if it exists.
    pub fn owner_of(&self, asset: &AssetId) -> Option<&Account> {
        self.owners.get(asset)
    }

    /// Registers a new non-fungible asset with its first owner.
    ///
    /// Appends to the enumeration order only if the id is new; re-inserting
    /// an existing id is a logic error upstream and keeps its original slot.
    pub fn insert(&mut self, asset: AssetId, owner: Account) {
        if self.owners.insert(asset, owner).is_none() {
            self.order.push(asset);
        }
    }

    /// Repoints an existing asset to a new owner. No-op if the id is not
    /// registered.
    pub fn set_owner(&mut self, asset: AssetId, owner: Account) {
        if let Some(current) = self.owners.get_mut(&asset) {
            *current = owner;
        }
    }

    /// Removes an asset from the index. Only called when unwinding a
    /// rejected mint, so the id being removed is the most recent insertion
    /// and `rposition` finds it immediately.
    pub(crate) fn remove(&mut self, asset: &AssetId) -> Option<Account> {
        let removed = self.owners.remove(asset)?;
        if let Some(pos) = self.order.iter().rposition(|id| id == asset) {
            self.order.remove(pos);
        }
        Some(removed)
    }

    /// Number of registered non-fungible assets.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no non-fungible asset has been minted.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Enumerates (asset, owner) pairs in mint order.
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &Account)> {
        self.order
            .iter()
            .filter_map(|id| self.owners.get(id).map(|owner| (id, owner)))
    }
}
