use serde::{Deserialize, Serialize};

use crate::error::VentureSimError;
use crate::VentureSimResult;

/// Input parameters for the two-stage fund model.
///
/// Monetary fields are USD; rates are decimals (0.02 = 2%). Missing fields
/// deserialize to the host defaults, so partial JSON documents are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FundParams {
    /// Total LP commitments
    pub fund_size: f64,
    /// Fund life in years
    pub fund_life: u32,
    /// Annual management fee as a fraction of fund size
    pub mgmt_fee_rate: f64,
    /// Years charged at the full fee rate
    pub mgmt_fee_full_years: u32,
    /// Fraction of the full fee charged after the full-fee years
    pub mgmt_fee_stepdown: f64,
    /// Carried interest rate on profit
    pub carry: f64,
    /// Size of each discovery check
    pub discovery_check_size: f64,
    /// Number of discovery checks written
    pub max_discovery_checks: u32,
    /// Size of each conviction check
    pub conviction_check_size: f64,
    /// Informational lower bound on conviction checks (UI only; unused here)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conviction_check_min: Option<f64>,
    /// Informational upper bound on conviction checks (UI only; unused here)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conviction_check_max: Option<f64>,
    /// Share of discovery companies promoted to conviction
    pub graduation_rate: f64,
    /// Follow-on reserve as a fraction of fund size
    pub follow_on_reserve_percent: f64,
}

impl Default for FundParams {
    fn default() -> Self {
        Self {
            fund_size: 25_000_000.0,
            fund_life: 10,
            mgmt_fee_rate: 0.02,
            mgmt_fee_full_years: 4,
            mgmt_fee_stepdown: 0.7,
            carry: 0.20,
            discovery_check_size: 100_000.0,
            max_discovery_checks: 75,
            conviction_check_size: 400_000.0,
            conviction_check_min: None,
            conviction_check_max: None,
            graduation_rate: 0.25,
            follow_on_reserve_percent: 0.20,
        }
    }
}

impl FundParams {
    /// Reject out-of-range parameters before any sampling happens.
    pub fn validate(&self) -> VentureSimResult<()> {
        if !self.fund_size.is_finite() || self.fund_size < 0.0 {
            return Err(invalid("fund_size", "must be a non-negative number"));
        }
        if self.fund_life == 0 {
            return Err(invalid("fund_life", "must be at least 1 year"));
        }
        if !(0.0..=1.0).contains(&self.mgmt_fee_rate) {
            return Err(invalid("mgmt_fee_rate", "must be between 0 and 1"));
        }
        if self.mgmt_fee_full_years > self.fund_life {
            return Err(invalid("mgmt_fee_full_years", "must not exceed fund_life"));
        }
        if !(0.0..=1.0).contains(&self.mgmt_fee_stepdown) {
            return Err(invalid("mgmt_fee_stepdown", "must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.carry) {
            return Err(invalid("carry", "must be between 0 and 1"));
        }
        if !self.discovery_check_size.is_finite() || self.discovery_check_size < 0.0 {
            return Err(invalid("discovery_check_size", "must be a non-negative number"));
        }
        if !self.conviction_check_size.is_finite() || self.conviction_check_size < 0.0 {
            return Err(invalid("conviction_check_size", "must be a non-negative number"));
        }
        if !(0.0..=1.0).contains(&self.graduation_rate) {
            return Err(invalid("graduation_rate", "must be between 0 and 1"));
        }
        if !(0.0..=1.0).contains(&self.follow_on_reserve_percent) {
            return Err(invalid(
                "follow_on_reserve_percent",
                "must be between 0 and 1",
            ));
        }
        Ok(())
    }

    /// Sum of annual management fees over the fund life, with the step-down
    /// applied after the full-fee years.
    pub fn total_management_fees(&self) -> f64 {
        let mut total = 0.0;
        for year in 1..=self.fund_life {
            let rate = if year <= self.mgmt_fee_full_years {
                self.mgmt_fee_rate
            } else {
                self.mgmt_fee_rate * self.mgmt_fee_stepdown
            };
            total += rate * self.fund_size;
        }
        total
    }

    pub fn investable_capital(&self) -> f64 {
        self.fund_size - self.total_management_fees()
    }

    pub fn follow_on_reserve(&self) -> f64 {
        self.fund_size * self.follow_on_reserve_percent
    }

    /// Capital left for initial checks after fees and reserve. May go
    /// negative on a mis-configured fund; the simulator proceeds regardless
    /// and the driver surfaces a warning.
    pub fn deployable_capital(&self) -> f64 {
        self.investable_capital() - self.follow_on_reserve()
    }

    /// Number of discovery companies promoted to conviction.
    /// Round-half-away-from-zero, so cohort sizes are stable across platforms.
    pub fn num_conviction(&self) -> u32 {
        (f64::from(self.max_discovery_checks) * self.graduation_rate).round() as u32
    }
}

fn invalid(field: &str, reason: &str) -> VentureSimError {
    VentureSimError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(FundParams::default().validate().is_ok());
    }

    #[test]
    fn test_default_fee_schedule() {
        // 4 full years at 2% of 25M = 2M, then 6 years at 70% of that = 2.1M.
        let params = FundParams::default();
        let fees = params.total_management_fees();
        assert!((fees - 4_100_000.0).abs() < 1e-6, "fees={}", fees);
        assert!((params.investable_capital() - 20_900_000.0).abs() < 1e-6);
        assert!((params.follow_on_reserve() - 5_000_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_default_cohort_size() {
        // round(75 * 0.25) = 19
        assert_eq!(FundParams::default().num_conviction(), 19);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        let params = FundParams {
            max_discovery_checks: 10,
            graduation_rate: 0.25,
            ..FundParams::default()
        };
        // 2.5 rounds up, not to even
        assert_eq!(params.num_conviction(), 3);
    }

    #[test]
    fn test_validate_negative_fund_size() {
        let params = FundParams {
            fund_size: -1.0,
            ..FundParams::default()
        };
        match params.validate().unwrap_err() {
            VentureSimError::InvalidInput { field, .. } => assert_eq!(field, "fund_size"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_zero_fund_life() {
        let params = FundParams {
            fund_life: 0,
            ..FundParams::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rates_out_of_range() {
        for field in ["carry", "graduation_rate", "mgmt_fee_rate"] {
            let mut params = FundParams::default();
            match field {
                "carry" => params.carry = 1.5,
                "graduation_rate" => params.graduation_rate = -0.1,
                _ => params.mgmt_fee_rate = 2.0,
            }
            assert!(params.validate().is_err(), "{field} should be rejected");
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let params: FundParams =
            serde_json::from_str(r#"{"fund_size": 50000000.0, "carry": 0.25}"#).unwrap();
        assert_eq!(params.fund_size, 50_000_000.0);
        assert_eq!(params.carry, 0.25);
        assert_eq!(params.fund_life, 10);
        assert_eq!(params.max_discovery_checks, 75);
    }
}
