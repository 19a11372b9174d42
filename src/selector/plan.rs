//! Turns requested outputs into the ordered single-dimension requests
//! the selection phases work through.

use std::cmp::Reverse;

use crate::primitives::Output;
use crate::value::Value;

/// Sums every requested output into one total.
pub(super) fn merge_outputs(outputs: &[Output]) -> Value {
    outputs.iter().map(|output| output.value.clone()).sum()
}

/// Decomposes a merged total into single-dimension requests: one per
/// distinct asset, largest quantity first, with the full lovelace
/// requirement last. Phase 1 consumes this order as-is; phase 2 re-sorts
/// it ascending.
pub(super) fn split_requests(merged: &Value) -> Vec<Value> {
    let mut requests: Vec<Value> = merged
        .assets
        .iter()
        .map(|(id, quantity)| Value::from_asset(id.clone(), *quantity))
        .collect();
    requests.sort_by_key(|request| Reverse(request.magnitude()));

    // Lovelace is requested last, even when the outputs ask for none:
    // the fulfillment test still enforces the floor and fee reserve.
    requests.push(Value::from_lovelace(merged.lovelace));
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::AssetId;

    fn token(name: &str) -> AssetId {
        AssetId::new(
            "f0ff48bbb7bbe9d59a40f1ce90e9e9d0ff5002ec48f232b49ca0fb9a",
            name,
        )
    }

    #[test]
    fn merge_sums_every_dimension() {
        let outputs = vec![
            Output::new("addr_test1", 1_000_000).with_asset(token("A"), 3),
            Output::new("addr_test1", 2_500_000).with_asset(token("A"), 4),
            Output::new("addr_test2", 0).with_asset(token("B"), 9),
        ];

        let merged = merge_outputs(&outputs);
        assert_eq!(merged.lovelace, 3_500_000);
        assert_eq!(merged.asset_quantity(&token("A")), 7);
        assert_eq!(merged.asset_quantity(&token("B")), 9);
    }

    #[test]
    fn split_orders_tokens_descending_with_lovelace_last() {
        let merged = Value::from_lovelace(1_000_000)
            + Value::from_asset(token("A"), 7)
            + Value::from_asset(token("B"), 9);

        let requests = split_requests(&merged);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].asset_quantity(&token("B")), 9);
        assert_eq!(requests[1].asset_quantity(&token("A")), 7);
        assert_eq!(requests[2], Value::from_lovelace(1_000_000));
    }

    #[test]
    fn split_always_emits_a_lovelace_request() {
        let merged = Value::from_asset(token("A"), 1);
        let requests = split_requests(&merged);
        assert_eq!(requests.last(), Some(&Value::from_lovelace(0)));
    }
}
