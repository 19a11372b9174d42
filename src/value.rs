//! Multi-asset value arithmetic.
//!
//! A [`Value`] carries a lovelace quantity plus zero or more named-asset
//! quantities. The selection engine only ever builds single-dimension
//! requests out of these, but UTxO values are arbitrary bundles.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::Add;

use crate::primitives::AssetId;

/// Outcome of comparing two values along the candidate's dimension.
///
/// `Incomparable` means the reference holds none of the candidate's asset.
/// It is deliberately distinct from `Less`: a UTxO that does not carry an
/// asset at all must not be confused with one that carries less of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrdering {
    Less,
    Equal,
    Greater,
    Incomparable,
}

impl ValueOrdering {
    pub fn is_at_least(self) -> bool {
        matches!(self, ValueOrdering::Greater | ValueOrdering::Equal)
    }

    pub fn is_at_most(self) -> bool {
        matches!(self, ValueOrdering::Less | ValueOrdering::Equal)
    }
}

impl From<Ordering> for ValueOrdering {
    fn from(ord: Ordering) -> Self {
        match ord {
            Ordering::Less => ValueOrdering::Less,
            Ordering::Equal => ValueOrdering::Equal,
            Ordering::Greater => ValueOrdering::Greater,
        }
    }
}

/// A lovelace quantity plus named-asset quantities. Asset entries are
/// always positive; arithmetic drops entries that reach zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Value {
    pub lovelace: u64,
    pub assets: BTreeMap<AssetId, u64>,
}

impl Value {
    pub fn from_lovelace(lovelace: u64) -> Self {
        Self {
            lovelace,
            assets: BTreeMap::new(),
        }
    }

    pub fn from_asset(id: AssetId, quantity: u64) -> Self {
        let mut value = Self::default();
        value.set_asset(id, quantity);
        value
    }

    pub fn set_asset(&mut self, id: AssetId, quantity: u64) {
        if quantity == 0 {
            self.assets.remove(&id);
        } else {
            self.assets.insert(id, quantity);
        }
    }

    pub fn asset_quantity(&self, id: &AssetId) -> u64 {
        self.assets.get(id).copied().unwrap_or(0)
    }

    pub fn is_zero(&self) -> bool {
        self.lovelace == 0 && self.assets.is_empty()
    }

    /// Subtracts `other`, clamping every dimension at zero.
    pub fn saturating_sub(self, other: &Self) -> Self {
        let mut assets = self.assets;
        for (id, quantity) in &other.assets {
            let remaining = assets.get(id).copied().unwrap_or(0).saturating_sub(*quantity);
            if remaining == 0 {
                assets.remove(id);
            } else {
                assets.insert(id.clone(), remaining);
            }
        }
        Self {
            lovelace: self.lovelace.saturating_sub(other.lovelace),
            assets,
        }
    }

    /// Subtracts `other`, returning `None` if any dimension would go
    /// negative.
    pub fn checked_sub(self, other: &Self) -> Option<Self> {
        let mut assets = self.assets;
        for (id, quantity) in &other.assets {
            let held = assets.get(id).copied().unwrap_or(0);
            let remaining = held.checked_sub(*quantity)?;
            if remaining == 0 {
                assets.remove(id);
            } else {
                assets.insert(id.clone(), remaining);
            }
        }
        Some(Self {
            lovelace: self.lovelace.checked_sub(other.lovelace)?,
            assets,
        })
    }

    /// Compares `self` (the reference) against `candidate`, along the
    /// candidate's dimension.
    ///
    /// A pure-lovelace candidate compares lovelace quantities. A candidate
    /// carrying an asset compares only along that asset; if the reference
    /// holds none of it the values are [`ValueOrdering::Incomparable`].
    /// Requests built by the planner carry at most one asset, so the first
    /// entry is the only one consulted.
    pub fn compare(&self, candidate: &Self) -> ValueOrdering {
        match candidate.assets.first_key_value() {
            None => self.lovelace.cmp(&candidate.lovelace).into(),
            Some((id, quantity)) => match self.assets.get(id) {
                None => ValueOrdering::Incomparable,
                Some(held) => held.cmp(quantity).into(),
            },
        }
    }

    /// The quantity along this value's dominant dimension: lovelace when
    /// positive, otherwise the quantity of its first asset entry.
    pub fn magnitude(&self) -> u64 {
        if self.lovelace > 0 {
            self.lovelace
        } else {
            self.assets
                .first_key_value()
                .map(|(_, quantity)| *quantity)
                .unwrap_or(0)
        }
    }

    /// The haystack's quantity along this value's dimension: its lovelace
    /// if `self` is a lovelace request, otherwise its quantity of `self`'s
    /// asset (zero when absent, so asset-free UTxOs sort last).
    pub fn quantity_in(&self, haystack: &Self) -> u64 {
        if self.lovelace > 0 {
            haystack.lovelace
        } else {
            match self.assets.first_key_value() {
                Some((id, _)) => haystack.asset_quantity(id),
                None => 0,
            }
        }
    }
}

impl Add for Value {
    type Output = Value;

    fn add(mut self, other: Value) -> Value {
        self.lovelace += other.lovelace;
        for (id, quantity) in other.assets {
            *self.assets.entry(id).or_insert(0) += quantity;
        }
        self
    }
}

impl Add<&Value> for Value {
    type Output = Value;

    fn add(mut self, other: &Value) -> Value {
        self.lovelace += other.lovelace;
        for (id, quantity) in &other.assets {
            *self.assets.entry(id.clone()).or_insert(0) += quantity;
        }
        self
    }
}

impl Sum for Value {
    fn sum<I: Iterator<Item = Value>>(iter: I) -> Value {
        iter.fold(Value::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> AssetId {
        AssetId::new(
            "f0ff48bbb7bbe9d59a40f1ce90e9e9d0ff5002ec48f232b49ca0fb9a",
            "TOKE",
        )
    }

    fn other_token() -> AssetId {
        AssetId::new(
            "1d7f33bd23d85e1a25d87d86fac4f199c3197a2f7afeb662a0f34e1e",
            "RIVR",
        )
    }

    #[test]
    fn add_then_sub_round_trips() {
        let mut bundle = Value::from_lovelace(2_000_000);
        bundle.set_asset(token(), 7);

        let original = bundle.clone();
        let round_tripped = (bundle.clone() + bundle.clone())
            .checked_sub(&bundle)
            .expect("subtraction underflowed");
        assert_eq!(round_tripped, original);
    }

    #[test]
    fn sub_drops_zeroed_asset_entries() {
        let bundle = Value::from_lovelace(500) + Value::from_asset(token(), 3);
        let difference = bundle.checked_sub(&Value::from_asset(token(), 3)).unwrap();
        assert_eq!(difference, Value::from_lovelace(500));
        assert!(difference.assets.is_empty());
    }

    #[test]
    fn checked_sub_detects_underflow_per_dimension() {
        let bundle = Value::from_lovelace(100) + Value::from_asset(token(), 1);
        assert!(bundle.clone().checked_sub(&Value::from_asset(token(), 2)).is_none());
        assert!(bundle.checked_sub(&Value::from_lovelace(101)).is_none());
    }

    #[test]
    fn saturating_sub_clamps_at_zero() {
        let bundle = Value::from_lovelace(100) + Value::from_asset(token(), 1);
        let clamped =
            bundle.saturating_sub(&(Value::from_lovelace(500) + Value::from_asset(token(), 9)));
        assert!(clamped.is_zero());
    }

    #[test]
    fn compare_pure_lovelace_candidate_uses_lovelace() {
        let reference = Value::from_lovelace(5) + Value::from_asset(token(), 100);
        assert_eq!(reference.compare(&Value::from_lovelace(5)), ValueOrdering::Equal);
        assert_eq!(reference.compare(&Value::from_lovelace(6)), ValueOrdering::Less);
        assert_eq!(reference.compare(&Value::from_lovelace(4)), ValueOrdering::Greater);
    }

    #[test]
    fn compare_missing_asset_is_incomparable_not_less() {
        let reference = Value::from_lovelace(1_000_000) + Value::from_asset(token(), 50);
        let candidate = Value::from_asset(other_token(), 1);
        assert_eq!(reference.compare(&candidate), ValueOrdering::Incomparable);
    }

    #[test]
    fn compare_along_candidate_asset() {
        let reference = Value::from_asset(token(), 10);
        assert_eq!(reference.compare(&Value::from_asset(token(), 10)), ValueOrdering::Equal);
        assert_eq!(reference.compare(&Value::from_asset(token(), 3)), ValueOrdering::Greater);
        assert_eq!(reference.compare(&Value::from_asset(token(), 30)), ValueOrdering::Less);
    }

    #[test]
    fn magnitude_prefers_lovelace() {
        let bundle = Value::from_lovelace(9) + Value::from_asset(token(), 1_000);
        assert_eq!(bundle.magnitude(), 9);
        assert_eq!(Value::from_asset(token(), 1_000).magnitude(), 1_000);
        assert_eq!(Value::default().magnitude(), 0);
    }

    #[test]
    fn quantity_in_absent_asset_is_zero() {
        let needle = Value::from_asset(token(), 5);
        let haystack = Value::from_lovelace(2_000_000);
        assert_eq!(needle.quantity_in(&haystack), 0);

        let holder = Value::from_lovelace(1) + Value::from_asset(token(), 42);
        assert_eq!(needle.quantity_in(&holder), 42);
    }

    #[test]
    fn quantity_in_lovelace_needle_reads_lovelace() {
        let needle = Value::from_lovelace(1);
        let haystack = Value::from_lovelace(77) + Value::from_asset(token(), 5);
        assert_eq!(needle.quantity_in(&haystack), 77);
    }
}
