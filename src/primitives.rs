//! Ledger primitives shared by the selection strategies.

use std::fmt;

use crate::value::Value;

/// Identifies a token type: the hex-encoded minting policy plus the asset
/// name within that policy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssetId {
    pub policy: String,
    pub name: String,
}

impl AssetId {
    pub fn new(policy: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            name: name.into(),
        }
    }

}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.policy, self.name)
    }
}

/// A spendable ledger entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    /// Hex-encoded id of the transaction that produced this output
    pub transaction_id: String,
    pub index: u32,
    pub address: String,
    pub value: Value,
}

impl Utxo {
    pub fn new(transaction_id: impl Into<String>, index: u32, address: impl Into<String>, value: Value) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            index,
            address: address.into(),
            value,
        }
    }
}

/// A requested payment: destination address plus the value to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub address: String,
    pub value: Value,
}

impl Output {
    pub fn new(address: impl Into<String>, lovelace: u64) -> Self {
        Self {
            address: address.into(),
            value: Value::from_lovelace(lovelace),
        }
    }

    pub fn with_asset(mut self, id: AssetId, quantity: u64) -> Self {
        self.value.set_asset(id, quantity);
        self
    }
}
