use serde_json::Value;

use super::plain;

/// Keys worth printing alone, most important first.
const PRIORITY_KEYS: [&str; 6] = [
    "scheduled_payment",
    "total_interest",
    "total_cost",
    "registered",
    "username",
    "path",
];

/// Print just the headline value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", plain(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain(val));
            return;
        }
    }

    println!("{}", plain(result_obj));
}
