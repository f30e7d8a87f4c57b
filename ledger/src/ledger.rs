//! # Ledger Core — the Balance-Transfer Engine
//!
//! One [`Ledger`] tracks every asset in the system: fungible classes with
//! quantity semantics and non-fungible instances with unique-ownership
//! semantics, branched per asset id at the transfer site. The host invokes
//! each operation as an indivisible, serialized unit; the ledger's job is to
//! make every operation correct as a single atomic step.
//!
//! ## Effects before interaction
//!
//! Transfers follow a strict internal order: validate, mutate, record the
//! event, and only then call out to a programmable recipient's acceptance
//! hook. If the hook rejects, everything — balances, owner index, supply,
//! the event — is unwound as if the call never happened.
//!
//! ## Reentrancy
//!
//! The acceptance hook gets `&mut Ledger` and runs while the outer operation
//! is unfinished. A per-ledger in-progress guard makes every mutating entry
//! point non-reentrant: a hook that tries to sneak in a second transfer gets
//! [`LedgerError::ReentrantCall`], so a double-spend through the callback is
//! structurally impossible. Reads stay available to hooks.
//!
//! ## Issuance
//!
//! Minting is part of the ledger rather than a public standalone primitive.
//! [`Ledger::new`] leaves issuance open to any caller (the minimal
//! configuration); [`Ledger::with_minter`] restricts it to one designated
//! account, which is how the escrow engine isolates mint authority to
//! itself.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::debug;

use crate::account::Account;
use crate::asset::AssetId;
use crate::error::LedgerError;
use crate::events::{EventLog, LedgerEvent};
use crate::receiver::{AckToken, IncomingBatch, IncomingTransfer, Program, Response};
use crate::store::{BalanceStore, OwnerIndex, SupplyIndex};

/// The unified asset ledger.
pub struct Ledger {
    store: BalanceStore,
    supply: SupplyIndex,
    owners: OwnerIndex,
    /// Blanket operator approvals: owner -> approved operators.
    approvals: HashMap<Account, HashSet<Account>>,
    /// Registered programs. Membership is the "is programmable" predicate.
    programs: HashMap<Account, Rc<RefCell<dyn Program>>>,
    events: EventLog,
    /// When set, only this account may mint.
    minter: Option<Account>,
    /// In-progress guard; set for the duration of every mutating operation.
    in_operation: bool,
}

impl Ledger {
    /// Creates a ledger with open issuance: any caller may mint.
    pub fn new() -> Self {
        Self {
            store: BalanceStore::new(),
            supply: SupplyIndex::new(),
            owners: OwnerIndex::new(),
            approvals: HashMap::new(),
            programs: HashMap::new(),
            events: EventLog::new(),
            minter: None,
            in_operation: false,
        }
    }

    /// Creates a ledger whose issuance is restricted to `minter`.
    pub fn with_minter(minter: Account) -> Self {
        let mut ledger = Self::new();
        ledger.minter = Some(minter);
        ledger
    }

    // -----------------------------------------------------------------------
    // Programs
    // -----------------------------------------------------------------------

    /// Registers a program for `account`, making it a programmable
    /// recipient. Transfers into it will run the acceptance check from now
    /// on. Last registration wins.
    pub fn register_program(&mut self, account: Account, program: Rc<RefCell<dyn Program>>) {
        self.programs.insert(account, program);
    }

    /// Returns `true` if a program is registered for `account`.
    pub fn is_programmable(&self, account: &Account) -> bool {
        self.programs.contains_key(account)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Returns the balance of `owner` for `asset`.
    ///
    /// For non-fungible ids the owner index is authoritative: the answer is
    /// 1 for the recorded owner and 0 for everyone else, independent of raw
    /// balance storage.
    pub fn balance_of(&self, owner: &Account, asset: AssetId) -> u64 {
        match self.owners.owner_of(&asset) {
            Some(current) => u64::from(current == owner),
            None => self.store.get(&asset, owner),
        }
    }

    /// Batch balance read. Fails if the arrays differ in length; the result
    /// is parallel to the inputs.
    pub fn balance_of_batch(
        &self,
        owners: &[Account],
        assets: &[AssetId],
    ) -> Result<Vec<u64>, LedgerError> {
        if owners.len() != assets.len() {
            return Err(LedgerError::ArrayLengthMismatch {
                left: owners.len(),
                right: assets.len(),
            });
        }
        Ok(owners
            .iter()
            .zip(assets)
            .map(|(owner, asset)| self.balance_of(owner, *asset))
            .collect())
    }

    /// Returns the owner of a non-fungible asset, or [`LedgerError::NotFound`]
    /// if the id is not in the owner index.
    pub fn owner_of(&self, asset: AssetId) -> Result<&Account, LedgerError> {
        self.owners
            .owner_of(&asset)
            .ok_or(LedgerError::NotFound(asset))
    }

    /// Returns `true` if `asset` is registered as non-fungible.
    pub fn is_non_fungible(&self, asset: AssetId) -> bool {
        self.owners.contains(&asset)
    }

    /// Existence test across both classes: a non-fungible id in the owner
    /// index, or a fungible id with positive supply.
    pub fn exists(&self, asset: AssetId) -> bool {
        self.owners.contains(&asset) || self.supply.get(&asset) > 0
    }

    /// Total minted quantity of a fungible asset.
    pub fn fungible_supply(&self, asset: AssetId) -> u64 {
        self.supply.get(&asset)
    }

    /// Enumerates non-fungible assets and their owners, in mint order.
    pub fn non_fungible_assets(&self) -> impl Iterator<Item = (&AssetId, &Account)> {
        self.owners.iter()
    }

    /// Returns `true` if `operator` holds blanket approval from `owner`.
    /// Defaults to `false` for unset pairs.
    pub fn is_approved_for_all(&self, owner: &Account, operator: &Account) -> bool {
        self.approvals
            .get(owner)
            .is_some_and(|operators| operators.contains(operator))
    }

    /// All events emitted so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        self.events.all()
    }

    // -----------------------------------------------------------------------
    // Approvals
    // -----------------------------------------------------------------------

    /// Grants or revokes blanket operator rights from `caller` to
    /// `operator`. Idempotent; last write wins. Self-approval is rejected.
    pub fn set_approval_for_all(
        &mut self,
        caller: &Account,
        operator: &Account,
        approved: bool,
    ) -> Result<(), LedgerError> {
        self.enter()?;
        let result = self.set_approval_inner(caller, operator, approved);
        self.exit();
        result
    }

    fn set_approval_inner(
        &mut self,
        caller: &Account,
        operator: &Account,
        approved: bool,
    ) -> Result<(), LedgerError> {
        if operator == caller {
            return Err(LedgerError::Unauthorized {
                reason: "an account cannot approve itself as operator".into(),
            });
        }

        if approved {
            self.approvals
                .entry(caller.clone())
                .or_default()
                .insert(operator.clone());
        } else if let Some(operators) = self.approvals.get_mut(caller) {
            operators.remove(operator);
        }

        self.events.record(LedgerEvent::ApprovalForAll {
            owner: caller.clone(),
            operator: operator.clone(),
            approved,
        });
        debug!(owner = %caller, operator = %operator, approved, "approval changed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Transfers
    // -----------------------------------------------------------------------

    /// Moves `amount` of `asset` from `from` to `to`.
    ///
    /// The caller must be `from` or an approved operator of `from`. The
    /// fungible path is a checked decrement/increment; the non-fungible path
    /// requires `from` to be the recorded owner and repoints the owner index
    /// (for that path `amount` is not validated — a non-fungible id's amount
    /// is definitionally 1, a documented looseness of the model).
    ///
    /// If `to` is programmable, the acceptance check runs after the
    /// mutation; rejection unwinds the whole operation.
    pub fn transfer(
        &mut self,
        caller: &Account,
        from: &Account,
        to: &Account,
        asset: AssetId,
        amount: u64,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.enter()?;
        let result = self.transfer_inner(caller, from, to, asset, amount, data);
        self.exit();
        result
    }

    fn transfer_inner(
        &mut self,
        caller: &Account,
        from: &Account,
        to: &Account,
        asset: AssetId,
        amount: u64,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidDestination);
        }
        self.authorize(caller, from)?;

        let checkpoint = self.events.len();
        self.move_asset(from, to, asset, amount)?;
        self.events.record(LedgerEvent::TransferSingle {
            operator: caller.clone(),
            from: from.clone(),
            to: to.clone(),
            asset,
            amount,
        });
        debug!(asset = %asset, from = %from, to = %to, amount, "transfer");

        if let Err(err) = self.acceptance_single(caller, from, to, asset, amount, data) {
            self.unwind_move(from, to, asset, amount);
            self.events.truncate(checkpoint);
            return Err(err);
        }
        Ok(())
    }

    /// Moves several assets from `from` to `to` in one atomic operation.
    ///
    /// Pairs apply in input order; any failing pair unwinds all prior pairs.
    /// Authorization is evaluated once per call, never per pair. One
    /// aggregate event is emitted, and the acceptance check is invoked once,
    /// batched, after all mutations.
    pub fn batch_transfer(
        &mut self,
        caller: &Account,
        from: &Account,
        to: &Account,
        assets: &[AssetId],
        amounts: &[u64],
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.enter()?;
        let result = self.batch_transfer_inner(caller, from, to, assets, amounts, data);
        self.exit();
        result
    }

    fn batch_transfer_inner(
        &mut self,
        caller: &Account,
        from: &Account,
        to: &Account,
        assets: &[AssetId],
        amounts: &[u64],
        data: &[u8],
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidDestination);
        }
        if assets.len() != amounts.len() {
            return Err(LedgerError::ArrayLengthMismatch {
                left: assets.len(),
                right: amounts.len(),
            });
        }
        self.authorize(caller, from)?;

        let checkpoint = self.events.len();
        let mut applied: Vec<(AssetId, u64)> = Vec::with_capacity(assets.len());
        for (asset, amount) in assets.iter().zip(amounts) {
            if let Err(err) = self.move_asset(from, to, *asset, *amount) {
                for (done_asset, done_amount) in applied.iter().rev() {
                    self.unwind_move(from, to, *done_asset, *done_amount);
                }
                return Err(err);
            }
            applied.push((*asset, *amount));
        }

        self.events.record(LedgerEvent::TransferBatch {
            operator: caller.clone(),
            from: from.clone(),
            to: to.clone(),
            assets: assets.to_vec(),
            amounts: amounts.to_vec(),
        });
        debug!(from = %from, to = %to, pairs = assets.len(), "batch transfer");

        if let Err(err) = self.acceptance_batch(caller, from, to, assets, amounts, data) {
            for (done_asset, done_amount) in applied.iter().rev() {
                self.unwind_move(from, to, *done_asset, *done_amount);
            }
            self.events.truncate(checkpoint);
            return Err(err);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Issuance
    // -----------------------------------------------------------------------

    /// Mints a new non-fungible asset to `to`.
    ///
    /// Fails [`LedgerError::AlreadyExists`] if the id is registered in
    /// either class. Emits a transfer event with the null account as `from`
    /// and runs the acceptance check if `to` is programmable.
    pub fn mint_non_fungible(
        &mut self,
        caller: &Account,
        to: &Account,
        asset: AssetId,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.enter()?;
        let result = self.mint_non_fungible_inner(caller, to, asset, data);
        self.exit();
        result
    }

    fn mint_non_fungible_inner(
        &mut self,
        caller: &Account,
        to: &Account,
        asset: AssetId,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidDestination);
        }
        self.authorize_mint(caller)?;
        if self.exists(asset) {
            return Err(LedgerError::AlreadyExists(asset));
        }

        let checkpoint = self.events.len();
        self.owners.insert(asset, to.clone());
        self.store.set(asset, to, 1);
        self.events.record(LedgerEvent::TransferSingle {
            operator: caller.clone(),
            from: Account::null(),
            to: to.clone(),
            asset,
            amount: 1,
        });
        debug!(asset = %asset, to = %to, "non-fungible mint");

        let null = Account::null();
        if let Err(err) = self.acceptance_single(caller, &null, to, asset, 1, data) {
            self.owners.remove(&asset);
            self.store.set(asset, to, 0);
            self.events.truncate(checkpoint);
            return Err(err);
        }
        Ok(())
    }

    /// Mints `amount` units of a fungible asset to `to`, growing its total
    /// supply.
    ///
    /// Fails [`LedgerError::AlreadyExists`] if the id is registered as
    /// non-fungible. Supply and balance updates are checked; overflow is a
    /// hard failure.
    pub fn mint_fungible(
        &mut self,
        caller: &Account,
        to: &Account,
        asset: AssetId,
        amount: u64,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        self.enter()?;
        let result = self.mint_fungible_inner(caller, to, asset, amount, data);
        self.exit();
        result
    }

    fn mint_fungible_inner(
        &mut self,
        caller: &Account,
        to: &Account,
        asset: AssetId,
        amount: u64,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        if to.is_null() {
            return Err(LedgerError::InvalidDestination);
        }
        self.authorize_mint(caller)?;
        if self.owners.contains(&asset) {
            return Err(LedgerError::AlreadyExists(asset));
        }

        let prior_supply = self.supply.get(&asset);
        let prior_balance = self.store.get(&asset, to);
        let new_supply = prior_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                account: to.clone(),
                amount,
            })?;
        let new_balance = prior_balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                account: to.clone(),
                amount,
            })?;

        let checkpoint = self.events.len();
        self.supply.set(asset, new_supply);
        self.store.set(asset, to, new_balance);
        self.events.record(LedgerEvent::TransferSingle {
            operator: caller.clone(),
            from: Account::null(),
            to: to.clone(),
            asset,
            amount,
        });
        debug!(asset = %asset, to = %to, amount, supply = new_supply, "fungible mint");

        let null = Account::null();
        if let Err(err) = self.acceptance_single(caller, &null, to, asset, amount, data) {
            self.supply.set(asset, prior_supply);
            self.store.set(asset, to, prior_balance);
            self.events.truncate(checkpoint);
            return Err(err);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn enter(&mut self) -> Result<(), LedgerError> {
        if self.in_operation {
            return Err(LedgerError::ReentrantCall);
        }
        self.in_operation = true;
        Ok(())
    }

    fn exit(&mut self) {
        self.in_operation = false;
    }

    /// Caller must be the source itself or hold blanket approval from it.
    /// Evaluated once per operation — a batch cannot be partially
    /// authorized.
    fn authorize(&self, caller: &Account, from: &Account) -> Result<(), LedgerError> {
        if caller == from || self.is_approved_for_all(from, caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized {
                reason: format!("{caller} may not move assets of {from}"),
            })
        }
    }

    fn authorize_mint(&self, caller: &Account) -> Result<(), LedgerError> {
        match &self.minter {
            Some(minter) if minter != caller => Err(LedgerError::Unauthorized {
                reason: format!("{caller} is not the designated minter"),
            }),
            _ => Ok(()),
        }
    }

    /// Applies one (asset, amount) movement, branching on fungibility.
    /// All checks run before any write, so a failure leaves no partial
    /// state for this pair.
    fn move_asset(
        &mut self,
        from: &Account,
        to: &Account,
        asset: AssetId,
        amount: u64,
    ) -> Result<(), LedgerError> {
        if let Some(owner) = self.owners.owner_of(&asset) {
            if owner != from {
                return Err(LedgerError::OwnershipMismatch {
                    asset,
                    claimed: from.clone(),
                    owner: owner.clone(),
                });
            }
            self.store.set(asset, from, 0);
            self.store.set(asset, to, 1);
            self.owners.set_owner(asset, to.clone());
            return Ok(());
        }

        let available = self.store.get(&asset, from);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                asset,
                account: from.clone(),
                available,
                requested: amount,
            });
        }
        if from == to {
            // No net movement; the balance precondition still applied.
            return Ok(());
        }
        let new_dest = self
            .store
            .get(&asset, to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow {
                account: to.clone(),
                amount,
            })?;
        self.store.set(asset, from, available - amount);
        self.store.set(asset, to, new_dest);
        Ok(())
    }

    /// Reverses a successful [`Self::move_asset`]. Only called under the
    /// in-progress guard, so nothing has touched these balances since the
    /// forward move and the arithmetic cannot underflow or overflow.
    fn unwind_move(&mut self, from: &Account, to: &Account, asset: AssetId, amount: u64) {
        if self.owners.contains(&asset) {
            self.store.set(asset, to, 0);
            self.store.set(asset, from, 1);
            self.owners.set_owner(asset, from.clone());
        } else if from != to {
            let dest = self.store.get(&asset, to);
            self.store.set(asset, to, dest - amount);
            let src = self.store.get(&asset, from);
            self.store.set(asset, from, src + amount);
        }
    }

    /// Runs the single-transfer acceptance check against `to`'s program, if
    /// any. Non-programmable recipients always accept.
    fn acceptance_single(
        &mut self,
        operator: &Account,
        from: &Account,
        to: &Account,
        asset: AssetId,
        amount: u64,
        data: &[u8],
    ) -> Result<(), LedgerError> {
        let Some(program) = self.programs.get(to).map(Rc::clone) else {
            return Ok(());
        };
        let incoming = IncomingTransfer {
            operator,
            from,
            asset,
            amount,
            data,
        };
        let response = program.borrow_mut().on_single_received(self, &incoming);
        Self::interpret(response, AckToken::single())
    }

    /// Runs the batched acceptance check against `to`'s program, if any.
    fn acceptance_batch(
        &mut self,
        operator: &Account,
        from: &Account,
        to: &Account,
        assets: &[AssetId],
        amounts: &[u64],
        data: &[u8],
    ) -> Result<(), LedgerError> {
        let Some(program) = self.programs.get(to).map(Rc::clone) else {
            return Ok(());
        };
        let incoming = IncomingBatch {
            operator,
            from,
            assets,
            amounts,
            data,
        };
        let response = program.borrow_mut().on_batch_received(self, &incoming);
        Self::interpret(response, AckToken::batch())
    }

    fn interpret(response: Response, expected: AckToken) -> Result<(), LedgerError> {
        match response {
            Response::Ack(token) if token == expected => Ok(()),
            Response::Ack(_) => Err(LedgerError::RecipientRejected {
                reason: "acknowledgement token mismatch".into(),
            }),
            Response::Refuse(reason) => Err(LedgerError::RecipientRejected { reason }),
            Response::Unsupported => Err(LedgerError::RecipientProtocolUnsupported),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BASE_ASSET;

    fn nf(n: u8) -> AssetId {
        AssetId::derive("vela.test.nf", &[&[n]])
    }

    fn accounts() -> (Account, Account, Account) {
        (Account::new("alice"), Account::new("bob"), Account::new("carol"))
    }

    #[test]
    fn fungible_transfer_moves_balance() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 100, &[]).unwrap();

        ledger.transfer(&alice, &alice, &bob, BASE_ASSET, 30, &[]).unwrap();
        assert_eq!(ledger.balance_of(&alice, BASE_ASSET), 70);
        assert_eq!(ledger.balance_of(&bob, BASE_ASSET), 30);
    }

    #[test]
    fn underflow_is_a_hard_failure() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 10, &[]).unwrap();

        let result = ledger.transfer(&alice, &alice, &bob, BASE_ASSET, 11, &[]);
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { available: 10, requested: 11, .. })
        ));
        assert_eq!(ledger.balance_of(&alice, BASE_ASSET), 10);
    }

    #[test]
    fn transfer_to_null_rejected() {
        let (alice, _, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 10, &[]).unwrap();

        let result = ledger.transfer(&alice, &alice, &Account::null(), BASE_ASSET, 1, &[]);
        assert!(matches!(result, Err(LedgerError::InvalidDestination)));
    }

    #[test]
    fn self_transfer_is_a_net_noop() {
        let (alice, _, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 50, &[]).unwrap();

        ledger.transfer(&alice, &alice, &alice, BASE_ASSET, 20, &[]).unwrap();
        assert_eq!(ledger.balance_of(&alice, BASE_ASSET), 50);

        // The balance precondition still applies to self-transfers.
        let result = ledger.transfer(&alice, &alice, &alice, BASE_ASSET, 51, &[]);
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
    }

    #[test]
    fn operator_may_move_owner_assets() {
        let (alice, bob, carol) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 100, &[]).unwrap();

        let denied = ledger.transfer(&bob, &alice, &carol, BASE_ASSET, 10, &[]);
        assert!(matches!(denied, Err(LedgerError::Unauthorized { .. })));

        ledger.set_approval_for_all(&alice, &bob, true).unwrap();
        ledger.transfer(&bob, &alice, &carol, BASE_ASSET, 10, &[]).unwrap();
        assert_eq!(ledger.balance_of(&carol, BASE_ASSET), 10);

        ledger.set_approval_for_all(&alice, &bob, false).unwrap();
        let revoked = ledger.transfer(&bob, &alice, &carol, BASE_ASSET, 10, &[]);
        assert!(matches!(revoked, Err(LedgerError::Unauthorized { .. })));
    }

    #[test]
    fn self_approval_rejected() {
        let (alice, _, _) = accounts();
        let mut ledger = Ledger::new();
        let result = ledger.set_approval_for_all(&alice, &alice, true);
        assert!(matches!(result, Err(LedgerError::Unauthorized { .. })));
    }

    #[test]
    fn approval_defaults_to_false_and_is_idempotent() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        assert!(!ledger.is_approved_for_all(&alice, &bob));

        ledger.set_approval_for_all(&alice, &bob, true).unwrap();
        ledger.set_approval_for_all(&alice, &bob, true).unwrap();
        assert!(ledger.is_approved_for_all(&alice, &bob));
    }

    #[test]
    fn non_fungible_transfer_repoints_owner() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_non_fungible(&alice, &alice, nf(1), &[]).unwrap();

        ledger.transfer(&alice, &alice, &bob, nf(1), 1, &[]).unwrap();
        assert_eq!(ledger.owner_of(nf(1)).unwrap(), &bob);
        assert_eq!(ledger.balance_of(&alice, nf(1)), 0);
        assert_eq!(ledger.balance_of(&bob, nf(1)), 1);
    }

    #[test]
    fn non_fungible_amount_is_not_validated() {
        // A non-fungible id's amount is definitionally 1; any value is
        // accepted on this path.
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_non_fungible(&alice, &alice, nf(1), &[]).unwrap();

        ledger.transfer(&alice, &alice, &bob, nf(1), 999, &[]).unwrap();
        assert_eq!(ledger.balance_of(&bob, nf(1)), 1);
    }

    #[test]
    fn non_fungible_transfer_from_non_owner_rejected() {
        let (alice, bob, carol) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_non_fungible(&alice, &alice, nf(1), &[]).unwrap();

        // bob claims to own it but doesn't.
        let result = ledger.transfer(&bob, &bob, &carol, nf(1), 1, &[]);
        assert!(matches!(result, Err(LedgerError::OwnershipMismatch { .. })));
        assert_eq!(ledger.owner_of(nf(1)).unwrap(), &alice);
    }

    #[test]
    fn owner_lookup_of_unknown_id_is_not_found() {
        let ledger = Ledger::new();
        assert!(matches!(ledger.owner_of(nf(9)), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn ids_never_span_both_classes() {
        let (alice, _, _) = accounts();
        let mut ledger = Ledger::new();

        ledger.mint_non_fungible(&alice, &alice, nf(1), &[]).unwrap();
        let as_fungible = ledger.mint_fungible(&alice, &alice, nf(1), 5, &[]);
        assert!(matches!(as_fungible, Err(LedgerError::AlreadyExists(_))));

        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 5, &[]).unwrap();
        let as_non_fungible = ledger.mint_non_fungible(&alice, &alice, BASE_ASSET, &[]);
        assert!(matches!(as_non_fungible, Err(LedgerError::AlreadyExists(_))));
    }

    #[test]
    fn duplicate_non_fungible_mint_rejected() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_non_fungible(&alice, &alice, nf(1), &[]).unwrap();
        let result = ledger.mint_non_fungible(&bob, &bob, nf(1), &[]);
        assert!(matches!(result, Err(LedgerError::AlreadyExists(_))));
    }

    #[test]
    fn fungible_mint_accumulates_supply() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 60, &[]).unwrap();
        ledger.mint_fungible(&bob, &bob, BASE_ASSET, 40, &[]).unwrap();
        assert_eq!(ledger.fungible_supply(BASE_ASSET), 100);
        assert!(ledger.exists(BASE_ASSET));
    }

    #[test]
    fn gated_issuance_rejects_other_callers() {
        let (alice, bob, _) = accounts();
        let treasury = Account::new("treasury");
        let mut ledger = Ledger::with_minter(treasury.clone());

        let denied = ledger.mint_fungible(&alice, &alice, BASE_ASSET, 10, &[]);
        assert!(matches!(denied, Err(LedgerError::Unauthorized { .. })));

        ledger.mint_fungible(&treasury, &bob, BASE_ASSET, 10, &[]).unwrap();
        assert_eq!(ledger.balance_of(&bob, BASE_ASSET), 10);
    }

    #[test]
    fn batch_transfer_applies_all_pairs_in_order() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 100, &[]).unwrap();
        ledger.mint_non_fungible(&alice, &alice, nf(1), &[]).unwrap();

        ledger
            .batch_transfer(&alice, &alice, &bob, &[BASE_ASSET, nf(1)], &[25, 1], &[])
            .unwrap();
        assert_eq!(ledger.balance_of(&bob, BASE_ASSET), 25);
        assert_eq!(ledger.owner_of(nf(1)).unwrap(), &bob);

        // One aggregate event for the whole batch.
        let batches = ledger
            .events()
            .iter()
            .filter(|e| matches!(e, LedgerEvent::TransferBatch { .. }))
            .count();
        assert_eq!(batches, 1);
    }

    #[test]
    fn batch_length_mismatch_rejected() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        let result = ledger.batch_transfer(&alice, &alice, &bob, &[BASE_ASSET], &[1, 2], &[]);
        assert!(matches!(result, Err(LedgerError::ArrayLengthMismatch { left: 1, right: 2 })));
    }

    #[test]
    fn balance_of_batch_is_parallel_to_inputs() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 70, &[]).unwrap();
        ledger.mint_non_fungible(&bob, &bob, nf(1), &[]).unwrap();

        let balances = ledger
            .balance_of_batch(
                &[alice.clone(), bob.clone(), alice.clone()],
                &[BASE_ASSET, nf(1), nf(1)],
            )
            .unwrap();
        assert_eq!(balances, vec![70, 1, 0]);

        let mismatch = ledger.balance_of_batch(&[alice], &[BASE_ASSET, nf(1)]);
        assert!(matches!(mismatch, Err(LedgerError::ArrayLengthMismatch { .. })));
    }

    #[test]
    fn non_fungible_enumeration_follows_mint_order() {
        let (alice, bob, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_non_fungible(&alice, &alice, nf(2), &[]).unwrap();
        ledger.mint_non_fungible(&bob, &bob, nf(1), &[]).unwrap();

        let minted: Vec<_> = ledger.non_fungible_assets().map(|(id, _)| *id).collect();
        assert_eq!(minted, vec![nf(2), nf(1)]);
        assert!(!ledger.is_programmable(&alice));
    }

    #[test]
    fn events_record_mints_from_null() {
        let (alice, _, _) = accounts();
        let mut ledger = Ledger::new();
        ledger.mint_fungible(&alice, &alice, BASE_ASSET, 5, &[]).unwrap();

        match &ledger.events()[0] {
            LedgerEvent::TransferSingle { from, amount, .. } => {
                assert!(from.is_null());
                assert_eq!(*amount, 5);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
