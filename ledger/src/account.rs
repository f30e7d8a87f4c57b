//! # Accounts
//!
//! An [`Account`] is an opaque network identity — a holder of assets with no
//! internal structure beyond its address string. Whether an account is a
//! plain holder or a programmable, contract-like entity is not a property of
//! the account itself: it depends on whether a program has been registered
//! for it in the ledger (see [`crate::ledger::Ledger::register_program`]).
//!
//! The empty address is the *null account*. It is never a valid transfer
//! destination, and by convention it appears as the `from` side of mint
//! notifications.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque account identity.
///
/// Internally a string address. The ledger never interprets the contents —
/// equality and hashing are all it needs.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Account(String);

impl Account {
    /// Creates an account from an address string.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// The null account. Invalid as a destination; conventional mint source.
    pub fn null() -> Self {
        Self(String::new())
    }

    /// Returns `true` if this is the null account.
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the underlying address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Account {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Account {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "<null>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({self})")
    }
}
