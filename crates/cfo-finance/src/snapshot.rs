use crate::budget::{analyze_budget, BudgetItem};
use crate::metrics::{self, CashFlowItem};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CASH_RUNWAY_MONTHS: &str = "cash_runway_months";
pub const MONTHLY_BURN_RATE: &str = "monthly_burn_rate";
pub const CASH_BALANCE: &str = "cash_balance";
pub const MONTHLY_REVENUE: &str = "monthly_revenue";
pub const BUDGET_VARIANCE_PERCENT: &str = "budget_variance_percent";
pub const CUSTOMER_ACQUISITION_COST: &str = "customer_acquisition_cost";
pub const GROSS_MARGIN_PERCENT: &str = "gross_margin_percent";
pub const BURN_MULTIPLE: &str = "burn_multiple";

fn default_burn_months() -> u32 {
    3
}

/// Raw financial inputs from which alert metrics are derived.
///
/// Explicit values win over values derived from `cash_flow_items`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FinancialSnapshot {
    #[serde(default)]
    pub cash_balance: Option<f64>,
    #[serde(default)]
    pub monthly_burn_rate: Option<f64>,
    #[serde(default)]
    pub monthly_revenue: Option<f64>,
    /// Cost of goods sold for the month
    #[serde(default)]
    pub cogs: Option<f64>,
    #[serde(default)]
    pub marketing_spend: Option<f64>,
    #[serde(default)]
    pub new_customers: Option<u64>,
    /// Net new ARR added over the same month as the burn
    #[serde(default)]
    pub net_new_arr: Option<f64>,
    #[serde(default)]
    pub budget_items: Vec<BudgetItem>,
    #[serde(default)]
    pub cash_flow_items: Vec<CashFlowItem>,
    /// Months covered by `cash_flow_items` when deriving burn
    #[serde(default = "default_burn_months")]
    pub burn_months: u32,
}

impl Default for FinancialSnapshot {
    fn default() -> Self {
        Self {
            cash_balance: None,
            monthly_burn_rate: None,
            monthly_revenue: None,
            cogs: None,
            marketing_spend: None,
            new_customers: None,
            net_new_arr: None,
            budget_items: Vec::new(),
            cash_flow_items: Vec::new(),
            burn_months: default_burn_months(),
        }
    }
}

impl FinancialSnapshot {
    fn burn(&self) -> Option<f64> {
        self.monthly_burn_rate.or_else(|| {
            (!self.cash_flow_items.is_empty())
                .then(|| metrics::burn_rate(&self.cash_flow_items, self.burn_months))
        })
    }

    fn revenue(&self) -> Option<f64> {
        self.monthly_revenue.or_else(|| {
            (!self.cash_flow_items.is_empty()).then(|| metrics::mrr(&self.cash_flow_items))
        })
    }

    /// Metric map for alert evaluation.
    ///
    /// Only metrics whose inputs are present are emitted. Runway is omitted
    /// when it is infinite, CAC when there are no new customers, and budget
    /// variance when the total budget is not positive.
    pub fn alert_metrics(&self) -> HashMap<String, f64> {
        let mut out = HashMap::new();
        let burn = self.burn();
        let revenue = self.revenue();

        if let Some(cash) = self.cash_balance {
            out.insert(CASH_BALANCE.to_string(), cash);
            if let Some(months) = burn.and_then(|b| metrics::runway(cash, b)) {
                out.insert(CASH_RUNWAY_MONTHS.to_string(), months);
            }
        }
        if let Some(burn) = burn {
            out.insert(MONTHLY_BURN_RATE.to_string(), burn);
            if let Some(multiple) = self
                .net_new_arr
                .and_then(|arr| metrics::burn_multiple(burn, arr))
            {
                out.insert(BURN_MULTIPLE.to_string(), multiple);
            }
        }
        if let Some(revenue) = revenue {
            out.insert(MONTHLY_REVENUE.to_string(), revenue);
            if let Some(cogs) = self.cogs {
                out.insert(
                    GROSS_MARGIN_PERCENT.to_string(),
                    metrics::gross_margin(revenue, cogs),
                );
            }
        }
        if let (Some(spend), Some(customers)) = (self.marketing_spend, self.new_customers) {
            if customers > 0 {
                out.insert(
                    CUSTOMER_ACQUISITION_COST.to_string(),
                    metrics::cac(spend, customers),
                );
            }
        }
        if !self.budget_items.is_empty() {
            let analysis = analyze_budget(&self.budget_items);
            if analysis.total_budgeted > 0.0 {
                out.insert(BUDGET_VARIANCE_PERCENT.to_string(), analysis.total_variance);
            }
        }

        out
    }
}
