use serde_json::Value;
use std::io;

use super::{is_simulation_result, result_payload, SUMMARY_METRICS, SUMMARY_STATS};

/// Write output as CSV to stdout.
///
/// Simulation results become one row per summarized metric; other payloads
/// become two-column field/value rows.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    let payload = result_payload(value);

    if is_simulation_result(payload) {
        let mut header = vec!["metric"];
        header.extend(SUMMARY_STATS);
        let _ = wtr.write_record(&header);

        for metric in SUMMARY_METRICS {
            let mut row = vec![metric.to_string()];
            for stat in SUMMARY_STATS {
                let cell = payload
                    .get(metric)
                    .and_then(|s| s.get(stat))
                    .and_then(Value::as_f64)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                row.push(cell);
            }
            let _ = wtr.write_record(&row);
        }

        for key in ["prob_return_fund", "prob_2x", "prob_3x"] {
            if let Some(p) = payload.get(key).and_then(Value::as_f64) {
                let mut row = vec![key.to_string(), p.to_string()];
                row.resize(1 + SUMMARY_STATS.len(), String::new());
                let _ = wtr.write_record(&row);
            }
        }
    } else if let Value::Object(map) = payload {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
        }
    } else {
        let _ = wtr.write_record([&format_csv_value(payload)]);
    }

    let _ = wtr.flush();
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
