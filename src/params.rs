//! Protocol parameters consulted during selection.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The subset of ledger protocol parameters the selection engine needs.
/// Callers typically deserialize these from whatever parameter source
/// their bridge exposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolParams {
    /// Minimum lovelace any output, including change, must carry
    pub min_utxo_value: u64,
    /// Multiplied by the size of the transaction
    pub min_fee_coefficient: u64,
    /// Base cost for all transactions
    pub min_fee_constant: u64,
    /// Maximum transaction size in bytes
    pub max_tx_size: u64,
}

impl ProtocolParams {
    /// Worst-case fee for a transaction filled to the size limit. Reserved
    /// defensively while selecting, since the final fee is only known once
    /// the transaction is assembled.
    pub fn max_fee(&self) -> u64 {
        self.min_fee_coefficient * self.max_tx_size + self.min_fee_constant
    }

    /// Minimum lovelace an output carrying `value` must hold under these
    /// parameters.
    pub fn min_utxo_deposit(&self, value: &Value) -> u64 {
        min_ada_required(value, self.min_utxo_value)
    }
}

// Word counts from the ledger's minimum-value calculation: an ada-only
// UTxO entry occupies 27 eight-byte words, a token bundle adds 6 words of
// overhead plus its packed asset entries.
// https://github.com/IntersectMBO/cardano-ledger/blob/master/docs/adr/2022-12-01_007-mary-value-serialization.md
const ADA_ONLY_UTXO_WORDS: u64 = 27;
const BUNDLE_OVERHEAD_WORDS: u64 = 6;

/// Minimum lovelace an output carrying `value` must hold, scaled up from
/// `min_utxo_value` by the serialized size of the token bundle.
pub fn min_ada_required(value: &Value, min_utxo_value: u64) -> u64 {
    if value.assets.is_empty() {
        return min_utxo_value;
    }

    let asset_count = value.assets.len() as u64;
    let name_bytes: u64 = value.assets.keys().map(|id| id.name.len() as u64).sum();
    let policies: BTreeSet<&str> = value.assets.keys().map(|id| id.policy.as_str()).collect();
    let policy_bytes: u64 = policies.iter().map(|policy| (policy.len() / 2) as u64).sum();

    let bundle_words =
        BUNDLE_OVERHEAD_WORDS + (asset_count * 12 + name_bytes + policy_bytes).div_ceil(8);
    let scaled = (min_utxo_value / ADA_ONLY_UTXO_WORDS) * (ADA_ONLY_UTXO_WORDS + bundle_words);
    min_utxo_value.max(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::AssetId;

    fn params() -> ProtocolParams {
        ProtocolParams {
            min_utxo_value: 1_000_000,
            min_fee_coefficient: 44,
            min_fee_constant: 155_381,
            max_tx_size: 16_384,
        }
    }

    #[test]
    fn max_fee_is_linear_in_tx_size() {
        assert_eq!(params().max_fee(), 44 * 16_384 + 155_381);
    }

    #[test]
    fn ada_only_value_needs_exactly_the_floor() {
        assert_eq!(params().min_utxo_deposit(&Value::from_lovelace(123)), 1_000_000);
    }

    #[test]
    fn token_bundle_scales_the_floor_up() {
        let token = AssetId::new(
            "f0ff48bbb7bbe9d59a40f1ce90e9e9d0ff5002ec48f232b49ca0fb9a",
            "TOKE",
        );
        let bundle = Value::from_lovelace(1) + Value::from_asset(token, 10);

        // one asset: 6 + ceil((12 + 4 + 28) / 8) = 12 bundle words
        let expected = (1_000_000 / 27) * (27 + 12);
        assert_eq!(params().min_utxo_deposit(&bundle), expected);
        assert!(expected > 1_000_000);
    }

    #[test]
    fn floor_never_drops_below_min_utxo_value() {
        let token = AssetId::new("ab", "x");
        let bundle = Value::from_asset(token, 1);
        assert!(min_ada_required(&bundle, 27) >= 27);
    }
}
