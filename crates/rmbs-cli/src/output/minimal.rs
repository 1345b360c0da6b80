use serde_json::Value;

use super::{format_scalar, result_of};

/// Print just the key answer value from the output.
///
/// Looks for well-known fields in the result (and its summary) in order of
/// priority, then falls back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    let priority_keys = ["total_cash_flow", "level_payment"];

    if let Value::Object(map) = result_obj {
        let summary = map.get("summary").and_then(Value::as_object);
        for key in &priority_keys {
            let found = summary
                .and_then(|s| s.get(*key))
                .or_else(|| map.get(*key));
            if let Some(val) = found {
                if !val.is_null() {
                    println!("{}", format_scalar(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}
