use serde_json::Value;

use super::{is_simulation_result, result_payload};

/// Print just the key answer value from the output.
///
/// For a simulation result that is the median net TVPI; for the IRR solver
/// it is the rate; otherwise fall back to the first field.
pub fn print_minimal(value: &Value) {
    let payload = result_payload(value);

    if is_simulation_result(payload) {
        if let Some(p50) = payload
            .get("net_tvpi")
            .and_then(|s| s.get("p50"))
            .and_then(Value::as_f64)
        {
            println!("{}", p50);
            return;
        }
    }

    if let Some(irr) = payload.get("irr").and_then(Value::as_f64) {
        println!("{}", irr);
        return;
    }

    if let Some((key, val)) = payload.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, format_minimal(val));
        return;
    }

    println!("{}", format_minimal(payload));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
