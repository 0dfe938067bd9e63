//! JSON merge helper for layered configuration.

use serde_json::Value;

/// Merge overlay values into the base. Objects merge key by key; anything
/// else (arrays included) is replaced wholesale.
pub(super) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::merge_json_values;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn arrays_are_replaced_not_concatenated() {
        let mut base = json!({"assistant": {"wake_phrases": ["simon"], "history_limit": 10}});
        merge_json_values(
            &mut base,
            &json!({"assistant": {"wake_phrases": ["jarvis"]}}),
        );
        assert_eq!(
            base,
            json!({"assistant": {"wake_phrases": ["jarvis"], "history_limit": 10}})
        );
    }
}
