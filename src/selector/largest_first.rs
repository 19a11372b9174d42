//! Greedy descending selection: consume the largest candidates first.

use std::cmp::Reverse;

use rand::Rng;

use super::state::SelectionState;
use super::{SelectionError, SelectionResult, Selector, is_fulfilled, plan, resolve_shortfall};
use crate::params::ProtocolParams;
use crate::primitives::{Output, Utxo};
use crate::value::Value;

/// Sorts the subset by how much of the requested dimension each candidate
/// carries, then commits candidates largest-first until the fulfillment
/// test passes. Shares its failure modes with the random strategy but has
/// no further fallback.
pub(super) fn desc_select(
    mut state: SelectionState,
    request: &Value,
    mut budget: i64,
    min_utxo_total: u64,
    params: &ProtocolParams,
) -> Result<SelectionState, SelectionError> {
    state
        .subset
        .sort_by_key(|utxo| Reverse(request.quantity_in(&utxo.value)));

    loop {
        if budget <= 0 {
            return Err(SelectionError::InputLimitExceeded);
        }
        if state.subset.is_empty() {
            if is_fulfilled(params, request, &state.amount, 0, 0) {
                return Err(SelectionError::MinUtxoError);
            }
            return Err(SelectionError::InputsExhausted);
        }

        state.pick(0);
        budget -= 1;

        let free = state.subset.len().saturating_sub(1);
        if is_fulfilled(params, request, &state.amount, min_utxo_total, free) {
            break;
        }
    }

    state.drain_subset();
    Ok(state)
}

/// Largest-first selection, usable on its own when deterministic input
/// choice matters more than spreading consumption across the pool.
#[derive(Debug, Default)]
pub struct LargestFirst {
    params: Option<ProtocolParams>,
}

impl LargestFirst {
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params: Some(params),
        }
    }

    pub fn configure(&mut self, params: ProtocolParams) {
        self.params = Some(params);
    }

    pub fn select(
        &self,
        inputs: &[Utxo],
        outputs: &[Output],
        limit: usize,
    ) -> Result<SelectionResult, SelectionError> {
        let params = self.params.as_ref().ok_or(SelectionError::NotConfigured)?;
        let min_utxo_total = outputs.len() as u64 * params.min_utxo_value;

        let merged = plan::merge_outputs(outputs);
        let requests = plan::split_requests(&merged);
        let mut state = SelectionState::new(inputs.to_vec());

        for request in &requests {
            state.create_subset(request);
            let budget = limit as i64 - state.selection.len() as i64;
            state = desc_select(state, request, budget, min_utxo_total, params)?;
        }

        let (state, change) = resolve_shortfall(state, &merged, params, |state, top_up| {
            let budget = limit as i64 - state.selection.len() as i64;
            desc_select(state, top_up, budget, min_utxo_total, params)
        })?;

        Ok(SelectionResult {
            inputs: state.selection,
            outputs: outputs.to_vec(),
            remaining: state.remaining,
            amount: state.amount,
            change,
        })
    }
}

impl Selector for LargestFirst {
    fn select<R: Rng>(
        &self,
        utxos: &[Utxo],
        outputs: &[Output],
        limit: usize,
        _rng: &mut R,
    ) -> anyhow::Result<SelectionResult> {
        Ok(LargestFirst::select(self, utxos, outputs, limit)?)
    }
}
