use crate::error::{FinanceError, Result};
use crate::metrics::RunwayEstimate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest forecast horizon accepted (50 years).
pub const MAX_FORECAST_MONTHS: u32 = 600;

pub const DEFAULT_OPTIMISTIC_MULTIPLIER: f64 = 1.2;
pub const DEFAULT_PESSIMISTIC_MULTIPLIER: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ForecastRow {
    /// 1-based month index
    pub month: u32,
    pub starting_balance: f64,
    pub inflow: f64,
    pub outflow: f64,
    pub net_flow: f64,
    pub ending_balance: f64,
}

/// Projects the balance forward assuming constant monthly flows.
pub fn forecast_cash_flow(
    current_balance: f64,
    monthly_inflow: f64,
    monthly_outflow: f64,
    months: u32,
) -> Result<Vec<ForecastRow>> {
    if months > MAX_FORECAST_MONTHS {
        return Err(FinanceError::invalid(
            "months",
            format!("must be at most {MAX_FORECAST_MONTHS}, got {months}"),
        ));
    }
    for (field, value) in [
        ("current_balance", current_balance),
        ("monthly_inflow", monthly_inflow),
        ("monthly_outflow", monthly_outflow),
    ] {
        if !value.is_finite() {
            return Err(FinanceError::invalid(field, "must be a finite number"));
        }
    }

    let net_flow = monthly_inflow - monthly_outflow;
    let mut balance = current_balance;
    let rows = (1..=months)
        .map(|month| {
            let starting_balance = balance;
            balance += net_flow;
            ForecastRow {
                month,
                starting_balance,
                inflow: monthly_inflow,
                outflow: monthly_outflow,
                net_flow,
                ending_balance: balance,
            }
        })
        .collect();
    Ok(rows)
}

/// One scaled variant of the base case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Scenario {
    pub values: BTreeMap<String, f64>,
    /// Present when the scenario has both `cash_balance` and `monthly_burn`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runway: Option<RunwayEstimate>,
}

impl Scenario {
    fn scaled(base: &BTreeMap<String, f64>, multiplier: f64) -> Self {
        let values: BTreeMap<String, f64> = base
            .iter()
            .map(|(k, v)| (k.clone(), v * multiplier))
            .collect();
        let runway = match (values.get("cash_balance"), values.get("monthly_burn")) {
            (Some(cash), Some(burn)) => Some(RunwayEstimate::new(*cash, *burn)),
            _ => None,
        };
        Self { values, runway }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ScenarioAnalysis {
    pub base_case: Scenario,
    pub optimistic: Scenario,
    pub pessimistic: Scenario,
}

/// Scales every base value by the optimistic and pessimistic multipliers.
///
/// Both multipliers scale the burn as well as the cash, so runway stays the
/// same across scenarios when only those two keys are given.
pub fn scenario_analysis(
    base_case: &BTreeMap<String, f64>,
    optimistic_multiplier: f64,
    pessimistic_multiplier: f64,
) -> Result<ScenarioAnalysis> {
    for (field, value) in [
        ("optimistic_multiplier", optimistic_multiplier),
        ("pessimistic_multiplier", pessimistic_multiplier),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(FinanceError::invalid(
                field,
                "must be a finite, non-negative number",
            ));
        }
    }

    Ok(ScenarioAnalysis {
        base_case: Scenario::scaled(base_case, 1.0),
        optimistic: Scenario::scaled(base_case, optimistic_multiplier),
        pessimistic: Scenario::scaled(base_case, pessimistic_multiplier),
    })
}
