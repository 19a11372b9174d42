//! Random-Improve selection.
//!
//! Phase 1 draws candidates uniformly at random until each request is
//! fulfilled, falling back to largest-first when the input budget runs
//! out. Phase 2 revisits the requests smallest-first and keeps drawing
//! while doing so pulls the accumulated amount toward twice the request
//! without exceeding three times it. A final reconciliation pass makes
//! sure the change output can clear the ledger's minimum UTxO floor.

use rand::Rng;

use super::largest_first::desc_select;
use super::state::SelectionState;
use super::{SelectionError, SelectionResult, Selector, is_fulfilled, plan, resolve_shortfall};
use crate::params::ProtocolParams;
use crate::primitives::{Output, Utxo};
use crate::value::Value;

#[derive(Debug, Default)]
pub struct RandomImprove {
    params: Option<ProtocolParams>,
}

impl RandomImprove {
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            params: Some(params),
        }
    }

    pub fn configure(&mut self, params: ProtocolParams) {
        self.params = Some(params);
    }

    /// Selects inputs from `inputs` to fund `outputs`, committing at most
    /// `limit` of them. Draws come from `rng`; inject a seeded generator
    /// for reproducible runs.
    pub fn select<R: Rng>(
        &self,
        inputs: &[Utxo],
        outputs: &[Output],
        limit: usize,
        rng: &mut R,
    ) -> Result<SelectionResult, SelectionError> {
        let params = self.params.as_ref().ok_or(SelectionError::NotConfigured)?;
        let min_utxo_total = outputs.len() as u64 * params.min_utxo_value;

        let merged = plan::merge_outputs(outputs);
        let mut requests = plan::split_requests(&merged);
        let mut state = SelectionState::new(inputs.to_vec());

        tracing::debug!(
            pool = inputs.len(),
            requests = requests.len(),
            limit,
            "starting random-improve selection"
        );

        for request in &requests {
            state.create_subset(request);
            let budget = limit as i64 - state.selection.len() as i64;
            state = select_with_fallback(state, request, budget, min_utxo_total, params, rng)?;
        }

        // Phase 2 revisits the requests smallest-first.
        requests.sort_by_key(Value::magnitude);
        for request in &requests {
            state.create_subset(request);
            let ideal = request.clone() + request;
            let maximum = ideal.clone() + request;
            let budget = limit as i64 - state.selection.len() as i64;
            improve(&mut state, request, budget, &ideal, &maximum, rng);
        }

        let (state, change) = resolve_shortfall(state, &merged, params, |state, top_up| {
            let budget = limit as i64 - state.selection.len() as i64;
            select_with_fallback(state, top_up, budget, min_utxo_total, params, rng)
        })?;

        tracing::debug!(
            selected = state.selection.len(),
            amount = state.amount.lovelace,
            change = change.lovelace,
            "selection complete"
        );

        Ok(SelectionResult {
            inputs: state.selection,
            outputs: outputs.to_vec(),
            remaining: state.remaining,
            amount: state.amount,
            change,
        })
    }
}

impl Selector for RandomImprove {
    fn select<R: Rng>(
        &self,
        utxos: &[Utxo],
        outputs: &[Output],
        limit: usize,
        rng: &mut R,
    ) -> anyhow::Result<SelectionResult> {
        Ok(RandomImprove::select(self, utxos, outputs, limit, rng)?)
    }
}

/// Runs the random strategy on a clone of the state. A run that exceeds
/// the input budget is discarded wholesale and retried largest-first from
/// the untouched pre-attempt state; every other failure propagates.
fn select_with_fallback<R: Rng>(
    state: SelectionState,
    request: &Value,
    budget: i64,
    min_utxo_total: u64,
    params: &ProtocolParams,
    rng: &mut R,
) -> Result<SelectionState, SelectionError> {
    match random_select(state.clone(), request, budget, min_utxo_total, params, rng) {
        Err(SelectionError::InputLimitExceeded) => {
            tracing::debug!("random selection exceeded the input limit, retrying largest-first");
            desc_select(state, request, budget, min_utxo_total, params)
        }
        result => result,
    }
}

fn random_select<R: Rng>(
    mut state: SelectionState,
    request: &Value,
    mut budget: i64,
    min_utxo_total: u64,
    params: &ProtocolParams,
    rng: &mut R,
) -> Result<SelectionState, SelectionError> {
    loop {
        let free = state.subset.len();
        if is_fulfilled(params, request, &state.amount, min_utxo_total, free) {
            state.drain_subset();
            return Ok(state);
        }
        if budget <= 0 {
            return Err(SelectionError::InputLimitExceeded);
        }
        if free == 0 {
            if is_fulfilled(params, request, &state.amount, 0, 0) {
                return Err(SelectionError::MinUtxoError);
            }
            return Err(SelectionError::InputsExhausted);
        }

        state.pick(rng.random_range(0..free));
        budget -= 1;
    }
}

/// Phase-2 optimizer. Each draw is judged against the single request
/// unit, not the running total: a candidate is kept when adding it to one
/// request lands closer to `ideal` than the bare request does, without
/// pushing past `maximum`. Rejected draws go back to `remaining`.
fn improve<R: Rng>(
    state: &mut SelectionState,
    request: &Value,
    mut budget: i64,
    ideal: &Value,
    maximum: &Value,
    rng: &mut R,
) {
    while budget > 0
        && !state.subset.is_empty()
        && !state.amount.compare(ideal).is_at_least()
    {
        let index = rng.random_range(0..state.subset.len());
        let utxo = state.subset.remove(index);

        let candidate = utxo.value.clone() + request;
        let closer = ideal.magnitude().abs_diff(candidate.magnitude())
            < ideal.magnitude().abs_diff(request.magnitude());

        if closer && candidate.compare(maximum).is_at_most() {
            state.amount = state.amount.clone() + &utxo.value;
            state.selection.push(utxo);
            budget -= 1;
        } else {
            state.remaining.push(utxo);
        }
    }

    state.drain_subset();
}
