use crate::rng::Lcg;

// Both samplers are calibration constants, not tuning knobs: the band edges
// and payoff ranges are part of the reproducibility contract.
//
// Draw discipline: the zero branch consumes exactly one uniform (the band
// selector r); every payoff branch consumes exactly two (r, then the band
// position u). Reordering or skipping draws breaks stream alignment.

/// Exit multiple for a company that never graduates past its discovery check.
/// Seed/pre-seed-like: 70% zeros, thin tail out to 50x.
pub fn sample_discovery_only(rng: &mut Lcg) -> f64 {
    let r = rng.uniform();
    if r < 0.70 {
        return 0.0;
    }
    let u = rng.uniform();
    if r < 0.85 {
        0.5 + u * 1.5
    } else if r < 0.92 {
        2.0 + u * 3.0
    } else if r < 0.97 {
        5.0 + u * 5.0
    } else if r < 0.99 {
        10.0 + u * 10.0
    } else {
        20.0 + u * 30.0
    }
}

/// Exit multiple for a company promoted to a conviction check.
/// Top-quartile-like: half still zero, but a far heavier right tail (to 150x).
pub fn sample_conviction(rng: &mut Lcg) -> f64 {
    let r = rng.uniform();
    if r < 0.50 {
        return 0.0;
    }
    let u = rng.uniform();
    if r < 0.77 {
        0.8 + u * 0.4
    } else if r < 0.89 {
        2.5 + u * 1.5
    } else if r < 0.95 {
        5.0 + u * 5.0
    } else if r < 0.985 {
        15.0 + u * 10.0
    } else if r < 0.995 {
        30.0 + u * 20.0
    } else {
        75.0 + u * 75.0
    }
}
