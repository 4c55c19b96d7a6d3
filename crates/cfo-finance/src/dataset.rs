//! Dataset validation and the built-in sample dataset.

use crate::budget::BudgetItem;
use crate::kpi::{Kpi, TrendDirection};
use crate::metrics::{CashFlowItem, CashFlowKind};
use serde::{Deserialize, Serialize};

/// Budget, cash-flow and KPI records as used by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FinancialDataset {
    pub budget_data: Vec<BudgetItem>,
    pub cash_flow_data: Vec<CashFlowItem>,
    pub kpi_data: Vec<Kpi>,
}

// Loosely typed records so that incomplete uploads can still be checked.

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BudgetRecord {
    pub id: Option<String>,
    pub category: Option<String>,
    pub budgeted: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CashFlowRecord {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub amount: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct KpiRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub target: Option<f64>,
}

/// Dataset submitted for validation. Absent sections are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DatasetRecords {
    #[serde(default)]
    pub budget_data: Option<Vec<BudgetRecord>>,
    #[serde(default)]
    pub cash_flow_data: Option<Vec<CashFlowRecord>>,
    #[serde(default)]
    pub kpi_data: Option<Vec<KpiRecord>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn record_id(id: &Option<String>) -> &str {
    id.as_deref().unwrap_or("unknown")
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Checks a dataset for missing or inconsistent fields.
///
/// Errors make the record unusable; warnings flag suspicious values.
pub fn validate(data: &DatasetRecords) -> ValidationReport {
    let mut report = ValidationReport::default();

    for item in data.budget_data.iter().flatten() {
        let id = record_id(&item.id);
        if is_blank(&item.category) {
            report.errors.push(format!("Budget item {id} missing category"));
        }
        if item.budgeted.unwrap_or(0.0) < 0.0 {
            report
                .warnings
                .push(format!("Budget item {id} has negative budgeted amount"));
        }
    }

    for item in data.cash_flow_data.iter().flatten() {
        let id = record_id(&item.id);
        if !matches!(item.kind.as_deref(), Some("inflow" | "outflow")) {
            report
                .errors
                .push(format!("Cash flow item {id} has invalid type"));
        }
        if item.amount.unwrap_or(0.0) <= 0.0 {
            report
                .warnings
                .push(format!("Cash flow item {id} has zero or negative amount"));
        }
    }

    for item in data.kpi_data.iter().flatten() {
        let id = record_id(&item.id);
        if is_blank(&item.name) {
            report.errors.push(format!("KPI item {id} missing name"));
        }
        if item.target.unwrap_or(0.0) <= 0.0 {
            report
                .warnings
                .push(format!("KPI item {id} has zero or negative target"));
        }
    }

    report
}

fn budget(id: &str, category: &str, budgeted: f64, actual: f64) -> BudgetItem {
    BudgetItem {
        id: id.to_string(),
        category: category.to_string(),
        budgeted,
        actual,
        month: "2025-01".to_string(),
    }
}

fn cash_flow(
    id: &str,
    description: &str,
    amount: f64,
    category: &str,
    kind: CashFlowKind,
    date: &str,
    recurring: bool,
) -> CashFlowItem {
    CashFlowItem {
        id: id.to_string(),
        description: description.to_string(),
        amount,
        category: category.to_string(),
        kind,
        date: date.to_string(),
        recurring,
    }
}

fn kpi(id: &str, name: &str, value: f64, target: f64, unit: &str, trend: TrendDirection, change: f64) -> Kpi {
    Kpi {
        id: id.to_string(),
        name: name.to_string(),
        value,
        target,
        unit: unit.to_string(),
        trend,
        change,
    }
}

/// Fixed sample data for January 2025.
pub fn sample_dataset() -> FinancialDataset {
    use CashFlowKind::{Inflow, Outflow};

    FinancialDataset {
        budget_data: vec![
            budget("1", "Personnel", 50_000.0, 52_000.0),
            budget("2", "Marketing", 15_000.0, 12_000.0),
            budget("3", "Operations", 8_000.0, 8_500.0),
            budget("4", "R&D", 20_000.0, 18_000.0),
        ],
        cash_flow_data: vec![
            cash_flow("1", "Monthly Subscriptions", 75_000.0, "Revenue", Inflow, "2025-01-01", true),
            cash_flow("2", "Salaries", 50_000.0, "Personnel", Outflow, "2025-01-01", true),
            cash_flow("3", "Office Rent", 5_000.0, "Operations", Outflow, "2025-01-01", true),
            cash_flow("4", "Marketing Campaign", 12_000.0, "Marketing", Outflow, "2025-01-15", false),
        ],
        kpi_data: vec![
            kpi("1", "Monthly Recurring Revenue", 75_000.0, 80_000.0, "$", TrendDirection::Up, 5.2),
            kpi("2", "Customer Acquisition Cost", 150.0, 120.0, "$", TrendDirection::Down, -8.1),
            kpi("3", "Gross Margin", 68.5, 70.0, "%", TrendDirection::Stable, 0.3),
            kpi("4", "Cash Runway", 14.2, 18.0, "months", TrendDirection::Down, -2.1),
        ],
    }
}
