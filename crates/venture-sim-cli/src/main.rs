mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::irr::IrrArgs;
use commands::simulate::SimulateArgs;

/// Venture fund outcome simulation
#[derive(Parser)]
#[command(
    name = "vsim",
    version,
    about = "Monte Carlo simulation of two-stage venture fund outcomes",
    long_about = "Simulates venture fund outcomes under a discovery/conviction \
                  investment policy: many small discovery checks, graduation of \
                  the top fraction by noisy traction signal, and a follow-on \
                  reserve concentrated on the best conviction companies. \
                  Reports TVPI, DPI, and IRR distributions with summary \
                  quantiles and threshold probabilities."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Monte Carlo fund simulation
    Simulate(SimulateArgs),
    /// Solve the IRR of an annual cash-flow series
    Irr(IrrArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Irr(args) => commands::irr::run_irr(args),
        Commands::Version => {
            println!("vsim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
