use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::VentureSimError;
use crate::fund::params::FundParams;
use crate::fund::simulate::{simulate_once, SimulationResult};
use crate::rng::Lcg;
use crate::types::{with_metadata, ComputationOutput};
use crate::VentureSimResult;

/// Seven-number summary over one per-run metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub mean: f64,
    pub p10: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

/// Aggregate output of a Monte Carlo batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloResults {
    /// Per-run metrics in run order
    pub runs: Vec<SimulationResult>,
    pub gross_tvpi: SimulationSummary,
    pub net_tvpi: SimulationSummary,
    pub dpi_net: SimulationSummary,
    pub irr_net: SimulationSummary,
    /// Share of runs with net TVPI >= 1x
    pub prob_return_fund: f64,
    /// Share of runs with net TVPI >= 2x
    pub prob_2x: f64,
    /// Share of runs with net TVPI >= 3x
    pub prob_3x: f64,
    pub params: FundParams,
    pub num_simulations: u32,
}

/// Compute the percentile value from a **sorted** slice using linear
/// interpolation (the Type-7 convention).
fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    assert!(!sorted.is_empty());
    if sorted.len() == 1 {
        return sorted[0];
    }
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let frac = rank - lower as f64;
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Summarize a non-empty metric vector. The slice is sorted in place.
fn summarize(values: &mut [f64]) -> SimulationSummary {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len() as f64;
    SimulationSummary {
        mean: values.iter().sum::<f64>() / n,
        p10: percentile_sorted(values, 10.0),
        p25: percentile_sorted(values, 25.0),
        p50: percentile_sorted(values, 50.0),
        p75: percentile_sorted(values, 75.0),
        p90: percentile_sorted(values, 90.0),
        min: values[0],
        max: values[values.len() - 1],
    }
}

fn probability_at_least(runs: &[SimulationResult], threshold: f64) -> f64 {
    let count = runs.iter().filter(|r| r.net_tvpi >= threshold).count();
    count as f64 / runs.len() as f64
}

/// Run `num_simulations` independent fund realizations over one shared PRNG
/// stream and aggregate the results.
///
/// The runs are strictly sequential on a single stream: that is the
/// reproducibility contract. Capital-structure diagnostics are parameter
/// determined, so they are computed once here and surfaced as warnings
/// rather than per run.
pub fn run_monte_carlo(
    params: &FundParams,
    num_simulations: u32,
    seed: Option<i64>,
) -> VentureSimResult<ComputationOutput<MonteCarloResults>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    params.validate()?;
    if num_simulations == 0 {
        return Err(VentureSimError::InvalidInput {
            field: "num_simulations".into(),
            reason: "Must be at least 1".into(),
        });
    }

    let deployable = params.deployable_capital();
    if deployable < 0.0 {
        warnings.push(format!(
            "Follow-on reserve plus fees exceed fund size (deployable capital {:.0})",
            deployable
        ));
    }
    let planned = f64::from(params.max_discovery_checks) * params.discovery_check_size
        + f64::from(params.num_conviction()) * params.conviction_check_size;
    if planned > deployable {
        // Check sizes are not scaled down; the mis-configuration is surfaced
        // and total called capital may exceed the fund size.
        warnings.push(format!(
            "Planned initial checks ({:.0}) exceed deployable capital ({:.0})",
            planned, deployable
        ));
    }

    let mut rng = match seed {
        Some(s) => Lcg::new(s),
        None => Lcg::from_clock(),
    };

    let n = num_simulations as usize;
    let mut runs = Vec::with_capacity(n);
    for _ in 0..n {
        runs.push(simulate_once(params, &mut rng));
    }

    let mut gross_tvpi: Vec<f64> = runs.iter().map(|r| r.gross_tvpi).collect();
    let mut net_tvpi: Vec<f64> = runs.iter().map(|r| r.net_tvpi).collect();
    let mut dpi_net: Vec<f64> = runs.iter().map(|r| r.dpi_net).collect();
    let mut irr_net: Vec<f64> = runs.iter().map(|r| r.irr_net).collect();

    let results = MonteCarloResults {
        prob_return_fund: probability_at_least(&runs, 1.0),
        prob_2x: probability_at_least(&runs, 2.0),
        prob_3x: probability_at_least(&runs, 3.0),
        gross_tvpi: summarize(&mut gross_tvpi),
        net_tvpi: summarize(&mut net_tvpi),
        dpi_net: summarize(&mut dpi_net),
        irr_net: summarize(&mut irr_net),
        runs,
        params: params.clone(),
        num_simulations,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Two-Stage Fund Monte Carlo: Discovery/Conviction Graduation, Follow-On Reserve",
        &serde_json::json!({
            "fund_size": params.fund_size,
            "fund_life": params.fund_life,
            "max_discovery_checks": params.max_discovery_checks,
            "graduation_rate": params.graduation_rate,
            "follow_on_reserve_percent": params.follow_on_reserve_percent,
            "carry": params.carry,
            "num_simulations": num_simulations,
            "seed": seed,
        }),
        warnings,
        elapsed,
        results,
    ))
}
