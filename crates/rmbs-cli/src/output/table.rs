use rust_decimal::Decimal;
use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, result_of};

/// Period columns shown in the schedule grid, with their headers.
const PERIOD_COLUMNS: [(&str, &str); 8] = [
    ("month", "Month"),
    ("scheduled_principal", "Principal"),
    ("interest", "Interest"),
    ("prepayment", "Prepayment"),
    ("total_cash_flow", "Total CF"),
    ("senior_cash_flow", "Senior"),
    ("subordinate_cash_flow", "Subordinate"),
    ("ending_balance", "Balance"),
];

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(result) => {
            if let Some(Value::Array(periods)) = result.get("periods") {
                print_period_table(periods);
            }
            let scalars: Map<String, Value> = result
                .iter()
                .filter(|(k, _)| k.as_str() != "periods" && k.as_str() != "summary")
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            print_field_table(&scalars);
            if let Some(Value::Object(summary)) = result.get("summary") {
                println!("\nSummary:");
                print_field_table(summary);
            }
        }
        other => println!("{}", other),
    }

    if let Value::Object(envelope) = value {
        print_envelope_notes(envelope);
    }
}

fn print_period_table(periods: &[Value]) {
    if periods.is_empty() {
        println!("(no periods)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(PERIOD_COLUMNS.iter().map(|(_, header)| *header));
    for item in periods {
        if let Value::Object(row) = item {
            builder.push_record(
                PERIOD_COLUMNS
                    .iter()
                    .map(|(key, _)| row.get(*key).map(format_cell).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn print_field_table(map: &Map<String, Value>) {
    if map.is_empty() {
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.clone(), format_cell(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Decimal strings are shortened for display: amounts to cents, rates and
/// factors below one to six places.
fn format_cell(value: &Value) -> String {
    match value {
        Value::String(s) => match s.parse::<Decimal>() {
            Ok(d) if d.abs() >= Decimal::ONE => d.round_dp(2).to_string(),
            Ok(d) => d.round_dp(6).to_string(),
            Err(_) => s.clone(),
        },
        other => format_scalar(other),
    }
}
