use cfo_common::types::{AlertRule, Condition, Severity};

/// Built-in rule definitions seeded into every new store.
struct RuleDef {
    id: &'static str,
    name: &'static str,
    metric: &'static str,
    condition: Condition,
    threshold: f64,
    severity: Severity,
    cooldown_minutes: u32,
}

const DEFAULT_RULES: &[RuleDef] = &[
    // ---- Cash runway ----
    RuleDef {
        id: "runway_critical",
        name: "Cash Runway Critical",
        metric: "cash_runway_months",
        condition: Condition::Below,
        threshold: 3.0,
        severity: Severity::Critical,
        cooldown_minutes: 30,
    },
    RuleDef {
        id: "runway_warning",
        name: "Cash Runway Warning",
        metric: "cash_runway_months",
        condition: Condition::Below,
        threshold: 6.0,
        severity: Severity::High,
        cooldown_minutes: 60,
    },
    // ---- Spend ----
    RuleDef {
        id: "burn_rate_high",
        name: "High Burn Rate",
        metric: "monthly_burn_rate",
        condition: Condition::Above,
        threshold: 100_000.0,
        severity: Severity::Medium,
        cooldown_minutes: 120,
    },
    // ---- Revenue ----
    RuleDef {
        id: "revenue_decline",
        name: "Revenue Decline",
        metric: "monthly_revenue",
        condition: Condition::ChangePercent,
        threshold: -10.0,
        severity: Severity::High,
        cooldown_minutes: 60,
    },
    RuleDef {
        id: "cash_balance_low",
        name: "Low Cash Balance",
        metric: "cash_balance",
        condition: Condition::Below,
        threshold: 250_000.0,
        severity: Severity::High,
        cooldown_minutes: 120,
    },
    // ---- Budget & unit economics ----
    RuleDef {
        id: "budget_overspend",
        name: "Budget Overspend",
        metric: "budget_variance_percent",
        condition: Condition::Above,
        threshold: 15.0,
        severity: Severity::Medium,
        cooldown_minutes: 180,
    },
    RuleDef {
        id: "cac_high",
        name: "High Customer Acquisition Cost",
        metric: "customer_acquisition_cost",
        condition: Condition::Above,
        threshold: 200.0,
        severity: Severity::Medium,
        cooldown_minutes: 240,
    },
    RuleDef {
        id: "gross_margin_low",
        name: "Low Gross Margin",
        metric: "gross_margin_percent",
        condition: Condition::Below,
        threshold: 60.0,
        severity: Severity::Medium,
        cooldown_minutes: 180,
    },
];

/// The eight built-in rules, in evaluation order. They are ordinary rules
/// once seeded and can be replaced, disabled or removed.
pub fn default_rules() -> Vec<AlertRule> {
    DEFAULT_RULES
        .iter()
        .map(|def| {
            AlertRule::new(
                def.id,
                def.name,
                def.metric,
                def.condition,
                def.threshold,
                def.severity,
            )
            .with_cooldown_minutes(def.cooldown_minutes)
        })
        .collect()
}
