use clap::Args;
use serde_json::{json, Value};

use venture_sim_core::time_value;

/// Arguments for the standalone IRR solver
#[derive(Args)]
pub struct IrrArgs {
    /// Annual net cash flows, year 0 first (e.g. -100,50,50,50)
    #[arg(long, value_delimiter = ',', required = true, allow_hyphen_values = true)]
    pub cash_flows: Vec<f64>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rate = time_value::irr(&args.cash_flows)?;
    Ok(json!({
        "result": {
            "irr": rate,
            "cash_flows": args.cash_flows,
        }
    }))
}
