pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Names of the summarized metrics on a simulation result, in display order.
pub const SUMMARY_METRICS: [&str; 4] = ["gross_tvpi", "net_tvpi", "dpi_net", "irr_net"];

/// Statistics carried by each summary, in display order.
pub const SUMMARY_STATS: [&str; 8] = ["mean", "p10", "p25", "p50", "p75", "p90", "min", "max"];

/// Extract the `result` payload from the computation envelope, if present.
pub fn result_payload(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// True when the payload looks like a Monte Carlo simulation result.
pub fn is_simulation_result(payload: &Value) -> bool {
    SUMMARY_METRICS
        .iter()
        .all(|metric| payload.get(metric).map(Value::is_object).unwrap_or(false))
}
