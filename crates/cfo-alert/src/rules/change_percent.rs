use cfo_common::types::AlertRule;

/// Percent change from `previous` to `current`.
///
/// Returns `None` when `previous` is zero, since the change is undefined.
///
/// # Examples
///
/// ```
/// use cfo_alert::rules::change_percent::percent_change;
///
/// assert_eq!(percent_change(90.0, 100.0), Some(-10.0));
/// assert_eq!(percent_change(5.0, 0.0), None);
/// ```
pub fn percent_change(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 || !previous.is_finite() {
        return None;
    }
    Some((current - previous) / previous * 100.0)
}

/// Compares `current` against the most recent entry of `history`.
///
/// Returns the computed change when it is at or below `threshold`. A
/// missing or empty history, or a zero previous value, never fires.
pub fn check(current: f64, history: Option<&[f64]>, threshold: f64) -> Option<f64> {
    let previous = *history?.last()?;
    let change = percent_change(current, previous)?;
    (change <= threshold).then_some(change)
}

pub(crate) fn message(rule: &AlertRule, value: f64, change: f64) -> String {
    format!(
        "{}: {} changed by {:.2}% to {:.2} (threshold {:.2}%)",
        rule.name, rule.metric, change, value, rule.threshold,
    )
}
