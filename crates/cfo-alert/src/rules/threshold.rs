use cfo_common::types::{AlertRule, Condition};

/// Two values closer than this are considered equal.
pub const EQUALS_EPSILON: f64 = 0.01;

/// Evaluates the plain comparison conditions (`below`, `above`, `equals`).
///
/// Always false for [`Condition::ChangePercent`], which needs history; see
/// [`super::change_percent`].
pub fn check(condition: Condition, value: f64, threshold: f64) -> bool {
    match condition {
        Condition::Below => value < threshold,
        Condition::Above => value > threshold,
        Condition::Equals => (value - threshold).abs() < EQUALS_EPSILON,
        Condition::ChangePercent => false,
    }
}

pub(crate) fn message(rule: &AlertRule, value: f64) -> String {
    let relation = match rule.condition {
        Condition::Below => "below",
        Condition::Above => "above",
        _ => "equal to",
    };
    format!(
        "{}: {} is {:.2}, {} threshold of {:.2}",
        rule.name, rule.metric, value, relation, rule.threshold,
    )
}
