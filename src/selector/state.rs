//! Working state threaded through one selection run.

use crate::value::{Value, ValueOrdering};
use crate::primitives::Utxo;

/// The four collections a run operates on. UTxOs only ever move between
/// them: `selection` grows monotonically, `subset` holds the candidates
/// relevant to the active request and is disjoint from `remaining`, and
/// every subset is merged back into `remaining` once its request is
/// resolved. Nothing is ever dropped, so selection, remaining and subset
/// together always equal the original pool.
#[derive(Debug, Clone)]
pub(super) struct SelectionState {
    pub selection: Vec<Utxo>,
    pub remaining: Vec<Utxo>,
    pub subset: Vec<Utxo>,
    pub amount: Value,
}

impl SelectionState {
    pub fn new(pool: Vec<Utxo>) -> Self {
        Self {
            selection: Vec::new(),
            remaining: pool,
            subset: Vec::new(),
            amount: Value::default(),
        }
    }

    /// Splits `remaining` into the candidates relevant to `request`.
    ///
    /// For a token request only UTxOs actually holding that asset are
    /// relevant, however little of it they carry (several small holders
    /// may combine). For a lovelace request every UTxO qualifies.
    pub fn create_subset(&mut self, request: &Value) {
        if request.lovelace == 0 {
            let (subset, remaining): (Vec<Utxo>, Vec<Utxo>) = std::mem::take(&mut self.remaining)
                .into_iter()
                .partition(|utxo| utxo.value.compare(request) != ValueOrdering::Incomparable);
            self.subset = subset;
            self.remaining = remaining;
        } else {
            self.subset = std::mem::take(&mut self.remaining);
        }
    }

    /// Commits the subset member at `index` to the selection.
    pub fn pick(&mut self, index: usize) {
        let utxo = self.subset.remove(index);
        self.amount = self.amount.clone() + &utxo.value;
        self.selection.push(utxo);
    }

    /// Returns the unused subset members to `remaining`.
    pub fn drain_subset(&mut self) {
        self.remaining.append(&mut self.subset);
    }
}
