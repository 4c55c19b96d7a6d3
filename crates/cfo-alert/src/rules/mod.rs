//! Condition evaluation and message rendering for [`AlertRule`]s.

pub mod change_percent;
pub mod threshold;

use cfo_common::types::{AlertRule, Condition};

/// A satisfied rule condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trigger {
    /// Current metric value
    pub value: f64,
    /// Computed change, only for `change_percent` rules
    pub change_percent: Option<f64>,
}

/// Evaluates `rule` against the current `value` and the metric's history.
pub fn evaluate(rule: &AlertRule, value: f64, history: Option<&[f64]>) -> Option<Trigger> {
    match rule.condition {
        Condition::ChangePercent => {
            change_percent::check(value, history, rule.threshold).map(|change| Trigger {
                value,
                change_percent: Some(change),
            })
        }
        condition => threshold::check(condition, value, rule.threshold).then_some(Trigger {
            value,
            change_percent: None,
        }),
    }
}

/// Human-readable message for a fired rule. Values use two decimals.
pub fn render_message(rule: &AlertRule, trigger: &Trigger) -> String {
    match trigger.change_percent {
        Some(change) => change_percent::message(rule, trigger.value, change),
        None => threshold::message(rule, trigger.value),
    }
}
