//! Multi-asset coin selection for UTxO ledgers.
//!
//! Given a pool of spendable outputs and a set of requested payments,
//! the strategies in [`selector`] choose which UTxOs to consume so that
//! every requested asset quantity is covered, the change output clears
//! the ledger's minimum UTxO floor, and a worst-case fee stays payable.
//! Transaction assembly, signing and submission are left to the caller.

pub mod params;
pub mod primitives;
pub mod selector;
pub mod value;

pub use params::ProtocolParams;
pub use primitives::{AssetId, Output, Utxo};
pub use selector::{LargestFirst, RandomImprove, SelectionError, SelectionResult, Selector};
pub use value::{Value, ValueOrdering};
