use clap::Args;
use serde_json::Value;

use venture_sim_core::fund::monte_carlo;
use venture_sim_core::fund::params::FundParams;

use crate::input;

/// Arguments for the Monte Carlo fund simulation
#[derive(Args)]
pub struct SimulateArgs {
    /// Path to a FundParams JSON file (defaults apply when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Number of fund realizations to run
    #[arg(long, default_value_t = 5000)]
    pub num_simulations: u32,

    /// PRNG seed; omit for a wall-clock seed (non-reproducible)
    #[arg(long)]
    pub seed: Option<i64>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: FundParams = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        FundParams::default()
    };
    let result = monte_carlo::run_monte_carlo(&params, args.num_simulations, args.seed)?;
    Ok(serde_json::to_value(result)?)
}
