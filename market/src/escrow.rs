//! # Escrow Engine
//!
//! A marketplace workflow built entirely on the ledger's primitives. The
//! engine owns a gated [`Ledger`] (it is the sole minter) plus two record
//! tables, and composes issuance and transfers into a four-stage lifecycle:
//!
//! 1. **Credit** — a buyer converts native value into the base fungible
//!    asset at a fixed rate.
//! 2. **Offer** — a seller lists something for sale; the offer becomes a
//!    non-fungible asset owned by the seller, with a deterministic id
//!    derived from (seller, title).
//! 3. **Order** — a buyer commits the offer's price into the engine's
//!    custodial account; the order becomes a non-fungible asset minted to
//!    the offer's owner, with an id derived from (buyer, offer).
//! 4. **Settle** — the buyer either completes (funds to the seller, offer
//!    asset to the buyer) or complains (funds back to the buyer).
//!
//! The escrow logic has no independent complexity on purpose: every
//! uniqueness, authorization, and atomicity guarantee it needs is the
//! ledger's. Duplicate offers and duplicate orders fail because their
//! deterministic ids collide with the issuance existence check; settlement
//! can move the offer asset because listing granted the engine operator
//! rights; the custodial balance of a pending order is exactly that order's
//! amount until it settles, never partially released.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use vela_ledger::config::BASE_ASSET;
use vela_ledger::{Account, AssetId, Ledger, LedgerError};

use crate::error::MarketError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Base-asset units minted per native value unit in [`EscrowEngine::credit`].
pub const VALUE_CONVERSION_RATE: u64 = 10;

/// Domain tag for offer id derivation.
pub const OFFER_ID_TAG: &str = "vela.market.offer";

/// Domain tag for order id derivation.
pub const ORDER_ID_TAG: &str = "vela.market.order";

// ---------------------------------------------------------------------------
// Deterministic ids
// ---------------------------------------------------------------------------

/// Derives the offer id for (seller, title). Pure — tests can pre-compute
/// expected ids without an engine.
pub fn offer_id(seller: &Account, title: &str) -> AssetId {
    AssetId::derive(OFFER_ID_TAG, &[seller.as_str().as_bytes(), title.as_bytes()])
}

/// Derives the order id for (buyer, offer). Pure. One live order per
/// (buyer, offer) pair falls out of this: a second attempt derives the same
/// id and collides with the issuance existence check.
pub fn order_id(buyer: &Account, offer: AssetId) -> AssetId {
    AssetId::derive(ORDER_ID_TAG, &[buyer.as_str().as_bytes(), offer.as_bytes()])
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A listed offer. Never deleted; "open" means its representative asset
/// still sits with the seller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    /// The offer's asset id, derived from (seller, title).
    pub id: AssetId,
    /// The account that listed the offer.
    pub seller: Account,
    /// Human-readable title. Part of the id derivation.
    pub title: String,
    /// Price in base-asset units. Always positive.
    pub price: u64,
    /// When the offer was listed.
    pub created_at: DateTime<Utc>,
}

/// The lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Placed; the price is held in custody.
    Pending,
    /// Settled in the seller's favor; the buyer owns the offer asset.
    Completed,
    /// Settled in the buyer's favor; the hold was refunded.
    Complained,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "Pending"),
            OrderStatus::Completed => write!(f, "Completed"),
            OrderStatus::Complained => write!(f, "Complained"),
        }
    }
}

/// A placed order. Never deleted; terminal states are recorded, not erased.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// The order's asset id, derived from (buyer, offer).
    pub id: AssetId,
    /// The account that placed the order.
    pub buyer: Account,
    /// The offer this order is against.
    pub offer_id: AssetId,
    /// The amount held in custody, copied from the offer's price at
    /// placement time.
    pub amount: u64,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
    /// When the order reached a terminal state, if it has.
    pub settled_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// EscrowEngine
// ---------------------------------------------------------------------------

/// The escrow marketplace engine.
///
/// Owns the ledger it trades on. The custodial account doubles as the
/// ledger's designated minter, so issuance is reachable only through the
/// engine's own operations.
pub struct EscrowEngine {
    ledger: Ledger,
    custodian: Account,
    offers: HashMap<AssetId, Offer>,
    orders: HashMap<AssetId, Order>,
}

impl EscrowEngine {
    /// Creates an engine whose custodial account is `custodian`. The ledger
    /// is constructed with issuance gated to that account.
    pub fn new(custodian: Account) -> Self {
        Self {
            ledger: Ledger::with_minter(custodian.clone()),
            custodian,
            offers: HashMap::new(),
            orders: HashMap::new(),
        }
    }

    /// Read access to the underlying ledger.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable access to the underlying ledger, for host wiring: regular
    /// transfers and approvals remain public ledger operations. Issuance
    /// stays gated to the custodial account regardless.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// The engine's custodial account.
    pub fn custodian(&self) -> &Account {
        &self.custodian
    }

    /// Base-asset balance currently held in custody.
    pub fn custodial_balance(&self) -> u64 {
        self.ledger.balance_of(&self.custodian, BASE_ASSET)
    }

    /// Converts a native-value payment into base-asset credit for the
    /// caller.
    ///
    /// The credited quantity is `payment * VALUE_CONVERSION_RATE` and must
    /// be strictly greater than 1 base unit. Returns the credited quantity.
    pub fn credit(&mut self, caller: &Account, payment: u64) -> Result<u64, MarketError> {
        let credited = payment
            .checked_mul(VALUE_CONVERSION_RATE)
            .ok_or(MarketError::ConversionOverflow { payment })?;
        if credited <= 1 {
            return Err(MarketError::InsufficientCredit { payment, credited });
        }

        let custodian = self.custodian.clone();
        self.ledger
            .mint_fungible(&custodian, caller, BASE_ASSET, credited, &[])?;
        info!(buyer = %caller, payment, credited, "credit purchased");
        Ok(credited)
    }

    /// Lists a new offer and returns its id.
    ///
    /// Mints the offer's representative non-fungible asset to the caller —
    /// the issuance existence check is what enforces offer uniqueness per
    /// (seller, title). Listing also grants the custodial account operator
    /// rights over the seller, which settlement later relies on to move the
    /// offer asset to the buyer.
    pub fn create_offer(
        &mut self,
        caller: &Account,
        title: &str,
        price: u64,
    ) -> Result<AssetId, MarketError> {
        if price == 0 {
            return Err(MarketError::ZeroPrice);
        }

        let id = offer_id(caller, title);
        let custodian = self.custodian.clone();
        self.ledger.mint_non_fungible(&custodian, caller, id, &[])?;
        if caller != &custodian && !self.ledger.is_approved_for_all(caller, &custodian) {
            self.ledger.set_approval_for_all(caller, &custodian, true)?;
        }

        self.offers.insert(
            id,
            Offer {
                id,
                seller: caller.clone(),
                title: title.to_string(),
                price,
                created_at: Utc::now(),
            },
        );
        info!(offer = %id, seller = %caller, price, "offer listed");
        Ok(id)
    }

    /// Looks up an offer.
    pub fn get_offer(&self, id: AssetId) -> Result<&Offer, MarketError> {
        self.offers.get(&id).ok_or(MarketError::OfferNotFound(id))
    }

    /// Places an order against an offer and returns the order id.
    ///
    /// Mints the order's representative asset to the offer's current owner
    /// — which both fails fast on duplicate orders from the same buyer and
    /// records who must be paid — then takes the offer's price from the
    /// caller into custody. Offers whose representative asset has left the
    /// original seller no longer accept orders.
    pub fn place_order(&mut self, caller: &Account, offer: AssetId) -> Result<AssetId, MarketError> {
        let (price, seller) = {
            let record = self
                .offers
                .get(&offer)
                .ok_or(MarketError::OfferNotFound(offer))?;
            (record.price, record.seller.clone())
        };
        let holder = self.ledger.owner_of(offer)?.clone();
        if holder != seller {
            return Err(MarketError::OfferResold { offer });
        }

        let id = order_id(caller, offer);
        if self.ledger.exists(id) {
            return Err(LedgerError::AlreadyExists(id).into());
        }
        let available = self.ledger.balance_of(caller, BASE_ASSET);
        if available < price {
            return Err(LedgerError::InsufficientBalance {
                asset: BASE_ASSET,
                account: caller.clone(),
                available,
                requested: price,
            }
            .into());
        }

        // Mint before taking the hold: a seller-side program rejecting the
        // order asset fails while no funds have moved. The hold transfer
        // after it cannot fail — the balance was checked, hooks cannot
        // mutate mid-operation, and the custodial account carries no
        // program.
        let custodian = self.custodian.clone();
        self.ledger.mint_non_fungible(&custodian, &holder, id, &[])?;
        self.ledger
            .transfer(caller, caller, &custodian, BASE_ASSET, price, &[])?;

        self.orders.insert(
            id,
            Order {
                id,
                buyer: caller.clone(),
                offer_id: offer,
                amount: price,
                status: OrderStatus::Pending,
                placed_at: Utc::now(),
                settled_at: None,
            },
        );
        info!(order = %id, offer = %offer, buyer = %caller, amount = price, "order placed");
        Ok(id)
    }

    /// Looks up an order.
    pub fn get_order(&self, id: AssetId) -> Result<&Order, MarketError> {
        self.orders.get(&id).ok_or(MarketError::OrderNotFound(id))
    }

    /// Settles an order in the buyer's favor: refunds the held amount and
    /// marks the order complained. Only the buyer may call this, and only
    /// while the order is pending. Offer ownership is untouched.
    pub fn complain(&mut self, caller: &Account, id: AssetId) -> Result<(), MarketError> {
        let (buyer, amount) = self.settlement_preconditions(caller, id)?;

        let custodian = self.custodian.clone();
        self.ledger
            .transfer(&custodian, &custodian, &buyer, BASE_ASSET, amount, &[])?;
        self.close_order(id, OrderStatus::Complained);
        info!(order = %id, buyer = %buyer, amount, "order complained, hold refunded");
        Ok(())
    }

    /// Settles an order in the seller's favor: pays the held amount to the
    /// offer asset's owner, then transfers that asset to the buyer,
    /// finalizing the sale. Only the buyer may call this, and only while
    /// the order is pending.
    ///
    /// The whole settlement is validated before any funds move: the offer
    /// asset must still sit with the recorded seller (else
    /// [`MarketError::OfferResold`] — reachable when another buyer completed
    /// first) and the operator approval granted at listing time must still
    /// stand (else [`MarketError::ApprovalRevoked`]). Either way the hold is
    /// untouched and the buyer can still complain for a refund.
    pub fn complete_order(&mut self, caller: &Account, id: AssetId) -> Result<(), MarketError> {
        let (buyer, amount) = self.settlement_preconditions(caller, id)?;
        let offer = self
            .orders
            .get(&id)
            .map(|order| order.offer_id)
            .ok_or(MarketError::OrderNotFound(id))?;
        let seller = self
            .offers
            .get(&offer)
            .map(|record| record.seller.clone())
            .ok_or(MarketError::OfferNotFound(offer))?;

        let payee = self.ledger.owner_of(offer)?.clone();
        if payee != seller {
            return Err(MarketError::OfferResold { offer });
        }
        let custodian = self.custodian.clone();
        if payee != custodian && !self.ledger.is_approved_for_all(&payee, &custodian) {
            return Err(MarketError::ApprovalRevoked { seller: payee });
        }

        self.ledger
            .transfer(&custodian, &custodian, &payee, BASE_ASSET, amount, &[])?;
        // The engine moves the offer asset as the seller's approved
        // operator. If the buyer's program rejects the asset, take the
        // payout back; that unwind cannot fail — the approval was just
        // checked, the payee's balance was just credited, and the custodial
        // account carries no program.
        if let Err(err) = self.ledger.transfer(&custodian, &payee, &buyer, offer, 1, &[]) {
            self.ledger
                .transfer(&custodian, &payee, &custodian, BASE_ASSET, amount, &[])?;
            return Err(err.into());
        }
        self.close_order(id, OrderStatus::Completed);
        info!(order = %id, buyer = %buyer, seller = %payee, amount, "order completed");
        Ok(())
    }

    /// Shared complain/complete preconditions: the order exists, the caller
    /// is its buyer, and it is still pending.
    fn settlement_preconditions(
        &self,
        caller: &Account,
        id: AssetId,
    ) -> Result<(Account, u64), MarketError> {
        let order = self.orders.get(&id).ok_or(MarketError::OrderNotFound(id))?;
        if &order.buyer != caller {
            return Err(MarketError::WrongCaller {
                order: id,
                caller: caller.clone(),
            });
        }
        if order.status != OrderStatus::Pending {
            return Err(MarketError::OrderClosed {
                order: id,
                status: order.status,
            });
        }
        Ok((order.buyer.clone(), order.amount))
    }

    fn close_order(&mut self, id: AssetId, status: OrderStatus) {
        if let Some(order) = self.orders.get_mut(&id) {
            order.status = status;
            order.settled_at = Some(Utc::now());
        }
    }
}
