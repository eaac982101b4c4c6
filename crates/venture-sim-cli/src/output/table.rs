use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{is_simulation_result, result_payload, SUMMARY_METRICS, SUMMARY_STATS};

/// Format output as tables using the tabled crate.
///
/// Simulation results get a metric-by-statistic grid plus the threshold
/// probabilities; anything else falls back to a flat field/value listing.
pub fn print_table(value: &Value) {
    let payload = result_payload(value);

    if is_simulation_result(payload) {
        print_summary_grid(payload);
        print_probabilities(payload);
    } else {
        print_flat_object(payload);
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = value.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn print_summary_grid(payload: &Value) {
    let mut builder = Builder::default();
    let mut header = vec!["Metric".to_string()];
    header.extend(SUMMARY_STATS.iter().map(|s| s.to_string()));
    builder.push_record(header);

    for metric in SUMMARY_METRICS {
        let mut row = vec![metric.to_string()];
        for stat in SUMMARY_STATS {
            let cell = payload
                .get(metric)
                .and_then(|s| s.get(stat))
                .and_then(Value::as_f64)
                .map(|v| format!("{:.4}", v))
                .unwrap_or_default();
            row.push(cell);
        }
        builder.push_record(row);
    }

    let table = Table::from(builder);
    println!("{}", table);
}

fn print_probabilities(payload: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Threshold", "Probability"]);
    for (label, key) in [
        ("net TVPI >= 1x", "prob_return_fund"),
        ("net TVPI >= 2x", "prob_2x"),
        ("net TVPI >= 3x", "prob_3x"),
    ] {
        if let Some(p) = payload.get(key).and_then(Value::as_f64) {
            builder.push_record([label.to_string(), format!("{:.1}%", p * 100.0)]);
        }
    }
    let table = Table::from(builder);
    println!("\n{}", table);
}

fn print_flat_object(payload: &Value) {
    if let Value::Object(map) = payload {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    } else {
        println!("{}", payload);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
