use serde::{Deserialize, Serialize};

/// Direction of a cash-flow line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowKind {
    Inflow,
    Outflow,
}

/// A single cash movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CashFlowItem {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type")]
    pub kind: CashFlowKind,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub recurring: bool,
}

impl CashFlowItem {
    /// Signed amount: negative for outflows, positive for inflows,
    /// regardless of the sign of `amount`.
    pub fn adjusted_amount(&self) -> f64 {
        match self.kind {
            CashFlowKind::Inflow => self.amount.abs(),
            CashFlowKind::Outflow => -self.amount.abs(),
        }
    }
}

/// Runway computed for a cash balance and a monthly burn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RunwayEstimate {
    pub cash_balance: f64,
    pub monthly_burn: f64,
    /// Months until cash runs out; `null` when burn is zero or negative
    pub runway_months: Option<f64>,
}

impl RunwayEstimate {
    pub fn new(cash_balance: f64, monthly_burn: f64) -> Self {
        Self {
            cash_balance,
            monthly_burn,
            runway_months: runway(cash_balance, monthly_burn),
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.runway_months.is_none()
    }
}

/// Cash runway in months. `None` means infinite (no burn).
///
/// # Examples
///
/// ```
/// use cfo_finance::metrics::runway;
///
/// assert_eq!(runway(500_000.0, 50_000.0), Some(10.0));
/// assert_eq!(runway(500_000.0, 0.0), None);
/// ```
pub fn runway(cash_balance: f64, monthly_burn: f64) -> Option<f64> {
    if monthly_burn <= 0.0 {
        return None;
    }
    Some(cash_balance / monthly_burn)
}

/// Average monthly outflow over `months`. Zero months yields zero.
pub fn burn_rate(items: &[CashFlowItem], months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    let outflow: f64 = items
        .iter()
        .filter(|i| i.kind == CashFlowKind::Outflow)
        .map(CashFlowItem::adjusted_amount)
        .sum();
    outflow.abs() / f64::from(months)
}

/// Monthly recurring revenue: the sum of recurring inflows.
pub fn mrr(items: &[CashFlowItem]) -> f64 {
    items
        .iter()
        .filter(|i| i.kind == CashFlowKind::Inflow && i.recurring)
        .map(CashFlowItem::adjusted_amount)
        .sum()
}

/// Gross margin in percent; zero revenue yields zero.
pub fn gross_margin(revenue: f64, cogs: f64) -> f64 {
    if revenue == 0.0 {
        return 0.0;
    }
    (revenue - cogs) / revenue * 100.0
}

/// Customer acquisition cost; zero new customers yields zero.
pub fn cac(marketing_spend: f64, new_customers: u64) -> f64 {
    if new_customers == 0 {
        return 0.0;
    }
    marketing_spend / new_customers as f64
}

/// Net burn divided by net new ARR. `None` when no ARR was added.
pub fn burn_multiple(net_burn: f64, net_new_arr: f64) -> Option<f64> {
    if net_new_arr == 0.0 {
        return None;
    }
    Some(net_burn / net_new_arr)
}
