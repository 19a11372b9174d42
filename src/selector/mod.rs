//! Coin selection algorithms, based on [CIP-2](https://cips.cardano.org/cip/CIP-2).
//!
//! Two strategies are provided: [`RandomImprove`], the two-phase
//! randomized heuristic, and [`LargestFirst`], the greedy descending
//! strategy that also serves as its fallback. Both work over an
//! in-memory candidate pool and never touch the network; signing and
//! transaction assembly are the caller's concern.

use rand::Rng;

use crate::params::{ProtocolParams, min_ada_required};
use crate::primitives::{Output, Utxo};
use crate::value::{Value, ValueOrdering};

mod largest_first;
mod plan;
mod random_improve;
mod state;

pub use largest_first::LargestFirst;
pub use random_improve::RandomImprove;
use state::SelectionState;

pub trait Selector {
    fn select<R: Rng>(
        &self,
        utxos: &[Utxo],
        outputs: &[Output],
        limit: usize,
        rng: &mut R,
    ) -> anyhow::Result<SelectionResult>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The input-count budget ran out before the active request was
    /// covered. Recoverable only at the phase-1 fallback point; anywhere
    /// else it aborts the run.
    #[error("input limit exceeded before the requested value was covered")]
    InputLimitExceeded,
    /// The candidate pool cannot satisfy a requested dimension.
    #[error("candidate pool exhausted before the requested value was covered")]
    InputsExhausted,
    /// The requested quantity is covered, but the accumulated lovelace
    /// fails the minimum UTxO floor even with the whole pool consumed.
    #[error("selected lovelace cannot clear the minimum UTxO value")]
    MinUtxoError,
    #[error("protocol parameters not set, call configure() first")]
    NotConfigured,
}

/// Outcome of a selection run.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    /// UTxOs chosen to fund the requested outputs
    pub inputs: Vec<Utxo>,
    /// The requested outputs, passed through untouched
    pub outputs: Vec<Output>,
    /// Candidates left unspent
    pub remaining: Vec<Utxo>,
    /// Total value of `inputs`
    pub amount: Value,
    /// `amount` minus the merged outputs
    pub change: Value,
}

/// Whether `cumulated` covers `request`.
///
/// Lovelace requests are padded: the accumulated value must itself clear
/// the minimum UTxO floor for what has been selected so far, a request
/// below that floor is bumped past it by one `min_utxo_value` increment,
/// and while free candidates remain a worst-case fee is reserved on top.
/// Token requests compare quantities directly.
fn is_fulfilled(
    params: &ProtocolParams,
    request: &Value,
    cumulated: &Value,
    min_utxo_total: u64,
    free_candidates: usize,
) -> bool {
    let mut required = request.clone();

    if min_utxo_total > 0 && request.lovelace > 0 {
        let floor = Value::from_lovelace(min_ada_required(cumulated, min_utxo_total));
        if cumulated.compare(&floor) == ValueOrdering::Less {
            return false;
        }
        if request.compare(&floor) == ValueOrdering::Less {
            required = floor + Value::from_lovelace(params.min_utxo_value);
        }
        if free_candidates > 0 {
            required = required + Value::from_lovelace(params.max_fee());
        }
    }

    cumulated.compare(&required).is_at_least()
}

/// Final reconciliation: make sure the change left after funding the
/// outputs can itself live on the ledger (minimum UTxO floor) with a
/// worst-case fee still payable. When it cannot, synthesize one more
/// lovelace request and run the supplied phase-1 strategy once.
fn resolve_shortfall<F>(
    mut state: SelectionState,
    merged_outputs: &Value,
    params: &ProtocolParams,
    select: F,
) -> Result<(SelectionState, Value), SelectionError>
where
    F: FnOnce(SelectionState, &Value) -> Result<SelectionState, SelectionError>,
{
    let change = state.amount.clone().saturating_sub(merged_outputs);
    let min_required =
        Value::from_lovelace(params.min_utxo_deposit(&change) + params.max_fee());

    if change.compare(&min_required) == ValueOrdering::Less {
        tracing::debug!(
            change = change.lovelace,
            required = min_required.lovelace,
            "change below minimum UTxO floor plus fee reserve, topping up"
        );
        let top_up = Value::from_lovelace(
            min_required.lovelace - change.lovelace + state.amount.lovelace,
        );
        state.create_subset(&top_up);
        state = select(state, &top_up)?;
    }

    let change = state.amount.clone().saturating_sub(merged_outputs);
    Ok((state, change))
}
