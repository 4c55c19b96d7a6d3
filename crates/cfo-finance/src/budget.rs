use serde::{Deserialize, Serialize};

/// One budget line for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BudgetItem {
    pub id: String,
    pub category: String,
    pub budgeted: f64,
    pub actual: f64,
    /// `YYYY-MM`
    #[serde(default)]
    pub month: String,
}

impl BudgetItem {
    /// Overspend in percent of the budget (negative = underspend).
    pub fn variance(&self) -> f64 {
        if self.budgeted == 0.0 {
            return 0.0;
        }
        (self.actual - self.budgeted) / self.budgeted * 100.0
    }

    /// Share of the budget already spent, in percent.
    pub fn progress(&self) -> f64 {
        if self.budgeted == 0.0 {
            return 0.0;
        }
        self.actual / self.budgeted * 100.0
    }
}

/// Aggregate of every budget line sharing a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryBreakdown {
    pub category: String,
    pub budgeted: f64,
    pub actual: f64,
    pub variance: f64,
    pub items: Vec<BudgetItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BudgetAnalysis {
    pub total_budgeted: f64,
    pub total_actual: f64,
    pub total_variance: f64,
    /// Categories in the order they first appear in the input
    pub categories: Vec<CategoryBreakdown>,
}

/// Totals and per-category variance for a set of budget lines.
///
/// Variance is only computed where the budgeted amount is positive; it is
/// zero otherwise.
pub fn analyze_budget(items: &[BudgetItem]) -> BudgetAnalysis {
    let mut categories: Vec<CategoryBreakdown> = Vec::new();

    for item in items {
        let idx = match categories.iter().position(|c| c.category == item.category) {
            Some(idx) => idx,
            None => {
                categories.push(CategoryBreakdown {
                    category: item.category.clone(),
                    budgeted: 0.0,
                    actual: 0.0,
                    variance: 0.0,
                    items: Vec::new(),
                });
                categories.len() - 1
            }
        };
        let cat = &mut categories[idx];
        cat.budgeted += item.budgeted;
        cat.actual += item.actual;
        cat.items.push(item.clone());
    }

    for cat in &mut categories {
        cat.variance = percent_over(cat.actual, cat.budgeted);
    }

    let total_budgeted: f64 = items.iter().map(|i| i.budgeted).sum();
    let total_actual: f64 = items.iter().map(|i| i.actual).sum();

    BudgetAnalysis {
        total_budgeted,
        total_actual,
        total_variance: percent_over(total_actual, total_budgeted),
        categories,
    }
}

fn percent_over(actual: f64, budgeted: f64) -> f64 {
    if budgeted > 0.0 {
        (actual - budgeted) / budgeted * 100.0
    } else {
        0.0
    }
}
