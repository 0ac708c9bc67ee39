use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::plain;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go into a `Field | Value` table; nested objects
/// (summary, savings) and arrays of records (the schedule) get their own
/// tables underneath.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_object(result);
                print_footer(map);
            }
            _ => print_object(map),
        },
        Value::Array(arr) => print_records(arr),
        _ => println!("{}", value),
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map.iter().filter(|(_, v)| !v.is_array() && !v.is_object()) {
        builder.push_record([key.as_str(), &plain(val)]);
    }
    println!("{}", Table::from(builder));

    for (key, val) in map {
        match val {
            Value::Object(inner) => {
                println!("\n{}:", key);
                print_object(inner);
            }
            Value::Array(rows) => {
                println!("\n{}:", key);
                print_records(rows);
            }
            _ => {}
        }
    }
}

fn print_records(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(empty)");
        }
        for item in rows {
            println!("{}", plain(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(plain).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_footer(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
