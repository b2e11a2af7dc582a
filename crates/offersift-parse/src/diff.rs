use serde_json::{Map, Value};

use offersift_types::{FieldDiff, KeyPolicy, OfferAmounts};

/// Key whose diffs additionally carry element counts
const OFFERS_KEY: &str = "Offers";

/// Compute the per-field diff between an expected and actual result map.
///
/// Keys are visited in document order. A key missing on one side is
/// compared against JSON null. With [`KeyPolicy::WantedOnly`] only the
/// expected map's keys are visited; [`KeyPolicy::Union`] also visits keys
/// unique to the actual map. Non-object results yield an empty diff.
pub fn diff_result_maps(wanted: &Value, actual: &Value, policy: KeyPolicy) -> Vec<FieldDiff> {
    let empty = Map::new();
    let wanted_map = wanted.as_object().unwrap_or(&empty);
    let actual_map = actual.as_object().unwrap_or(&empty);

    let mut diffs = Vec::new();

    for (key, wanted_value) in wanted_map {
        let actual_value = actual_map.get(key).cloned().unwrap_or(Value::Null);
        if &actual_value != wanted_value {
            diffs.push(field_diff(key, actual_value, wanted_value.clone()));
        }
    }

    if policy == KeyPolicy::Union {
        for (key, actual_value) in actual_map {
            if !wanted_map.contains_key(key) {
                diffs.push(field_diff(key, actual_value.clone(), Value::Null));
            }
        }
    }

    diffs
}

fn field_diff(key: &str, actual: Value, wanted: Value) -> FieldDiff {
    let amounts = (key == OFFERS_KEY).then(|| OfferAmounts {
        actual: sequence_len(&actual),
        wanted: sequence_len(&wanted),
    });

    FieldDiff {
        key: key.to_string(),
        actual,
        wanted,
        amounts,
    }
}

fn sequence_len(value: &Value) -> usize {
    value.as_array().map(Vec::len).unwrap_or(0)
}
