use crate::error::VentureSimError;
use crate::VentureSimResult;

const CONVERGENCE_THRESHOLD: f64 = 1e-6;
const MAX_ITERATIONS: u32 = 100;

// Newton steps are clamped into this band; bisection brackets the same floor.
const MIN_RATE: f64 = -0.99;
const MAX_NEWTON_RATE: f64 = 10.0;
const MAX_BISECTION_RATE: f64 = 5.0;

/// Net Present Value of a series of annual cash flows at the given rate.
///
/// Discount factors are accumulated by iterative multiplication rather than
/// `powi` so the solver sees the same rounding on every evaluation.
pub fn npv(rate: f64, cash_flows: &[f64]) -> f64 {
    let one_plus_r = 1.0 + rate;
    let mut discount = 1.0;
    let mut result = 0.0;
    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        result += cf / discount;
    }
    result
}

/// Internal Rate of Return on annual net cash flows.
///
/// Newton-Raphson from a 10% guess, falling back to bisection on
/// [-0.99, 5.0] when the derivative vanishes or the iteration budget runs
/// out. Errors when no bracketing sign change exists; fund-level callers
/// substitute 0 for a failed solve.
pub fn irr(cash_flows: &[f64]) -> VentureSimResult<f64> {
    if cash_flows.len() < 2 {
        return Err(VentureSimError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let mut rate = 0.10;

    for _ in 0..MAX_ITERATIONS {
        let one_plus_r = 1.0 + rate;
        let mut discount = 1.0;
        let mut npv_val = 0.0;
        let mut dnpv = 0.0;

        for (t, cf) in cash_flows.iter().enumerate() {
            if t > 0 {
                discount *= one_plus_r;
                dnpv -= (t as f64) * cf / (discount * one_plus_r);
            }
            npv_val += cf / discount;
        }

        if npv_val.abs() < CONVERGENCE_THRESHOLD {
            return Ok(rate);
        }

        if dnpv.abs() < CONVERGENCE_THRESHOLD || !npv_val.is_finite() || !dnpv.is_finite() {
            break;
        }

        rate -= npv_val / dnpv;
        rate = rate.clamp(MIN_RATE, MAX_NEWTON_RATE);
    }

    bisect(cash_flows)
}

fn bisect(cash_flows: &[f64]) -> VentureSimResult<f64> {
    let mut lo = MIN_RATE;
    let mut hi = MAX_BISECTION_RATE;
    let mut npv_lo = npv(lo, cash_flows);
    let npv_hi = npv(hi, cash_flows);

    if !npv_lo.is_finite() || !npv_hi.is_finite() || npv_lo * npv_hi > 0.0 {
        return Err(VentureSimError::ConvergenceFailure {
            function: "IRR".into(),
            iterations: MAX_ITERATIONS,
            last_delta: npv_lo.min(npv_hi),
        });
    }

    let mut mid = 0.5 * (lo + hi);
    for _ in 0..MAX_ITERATIONS {
        mid = 0.5 * (lo + hi);
        let npv_mid = npv(mid, cash_flows);
        if npv_mid.abs() < CONVERGENCE_THRESHOLD || (hi - lo) < CONVERGENCE_THRESHOLD {
            return Ok(mid);
        }
        if npv_mid * npv_lo < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            npv_lo = npv_mid;
        }
    }

    Ok(mid)
}
