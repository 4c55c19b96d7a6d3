use crate::budget::{analyze_budget, BudgetAnalysis, BudgetItem};
use crate::kpi::Kpi;
use crate::metrics::{CashFlowItem, CashFlowKind};
use serde::{Deserialize, Serialize};

/// Totals over a set of cash-flow lines. Outflows are reported as a
/// positive total; `net_flow` is inflow minus outflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CashFlowSummary {
    pub total_inflow: f64,
    pub total_outflow: f64,
    pub net_flow: f64,
}

pub fn summarize_cash_flow(items: &[CashFlowItem]) -> CashFlowSummary {
    items
        .iter()
        .fold(CashFlowSummary::default(), |mut acc, item| {
            let amount = item.adjusted_amount();
            match item.kind {
                CashFlowKind::Inflow => acc.total_inflow += amount,
                CashFlowKind::Outflow => acc.total_outflow += amount.abs(),
            }
            acc.net_flow += amount;
            acc
        })
}

/// Budget, KPI and cash-flow figures bundled for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FinancialReport {
    pub budget_analysis: BudgetAnalysis,
    pub kpi_summary: Vec<Kpi>,
    pub cash_flow_summary: CashFlowSummary,
}

pub fn financial_report(
    budget_items: &[BudgetItem],
    cash_flow_items: &[CashFlowItem],
    kpis: &[Kpi],
) -> FinancialReport {
    FinancialReport {
        budget_analysis: analyze_budget(budget_items),
        kpi_summary: kpis.to_vec(),
        cash_flow_summary: summarize_cash_flow(cash_flow_items),
    }
}
