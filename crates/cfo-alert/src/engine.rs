use crate::error::{AlertError, Result};
use crate::event_log::EventLog;
use crate::rules;
use crate::store::RuleStore;
use crate::summary;
use cfo_common::types::{
    AlertEvent, AlertExport, AlertRule, AlertSummary, CurrentMetrics, HistoricalMetrics,
};
use cfo_notify::manager::NotificationDispatcher;
use chrono::{DateTime, Duration, Utc};

pub struct AlertEngine {
    rules: RuleStore,
    events: EventLog,
    notifier: NotificationDispatcher,
}

impl AlertEngine {
    pub fn new(rules: RuleStore, notifier: NotificationDispatcher) -> Self {
        Self {
            rules,
            events: EventLog::new(),
            notifier,
        }
    }

    /// Engine seeded with the built-in rules and no notification channels.
    pub fn with_default_rules() -> Self {
        Self::new(RuleStore::with_default_rules(), NotificationDispatcher::default())
    }

    pub fn rules(&self) -> &RuleStore {
        &self.rules
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn notifier(&self) -> &NotificationDispatcher {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut NotificationDispatcher {
        &mut self.notifier
    }

    /// Get a rule by its ID.
    pub fn get_rule(&self, id: &str) -> Result<&AlertRule> {
        self.rules
            .get(id)
            .ok_or_else(|| AlertError::RuleNotFound(id.to_string()))
    }

    /// Adds a rule, replacing any rule with the same id. Returns the
    /// replaced rule, if any.
    pub fn add_rule(&mut self, rule: AlertRule) -> Result<Option<AlertRule>> {
        validate_rule(&rule)?;
        let rule_id = rule.id.clone();
        let replaced = self.rules.add(rule);
        match &replaced {
            Some(_) => tracing::warn!(rule_id = %rule_id, "Alert rule already existed, replaced"),
            None => tracing::info!(rule_id = %rule_id, "Added alert rule"),
        }
        Ok(replaced)
    }

    /// Remove a rule by ID. Past events of the rule stay in the log.
    pub fn remove_rule(&mut self, id: &str) -> Result<AlertRule> {
        match self.rules.take(id) {
            Some(rule) => {
                tracing::info!(rule_id = %id, "Removed alert rule");
                Ok(rule)
            }
            None => {
                tracing::warn!(rule_id = %id, "Alert rule not found");
                Err(AlertError::RuleNotFound(id.to_string()))
            }
        }
    }

    pub fn set_rule_enabled(&mut self, id: &str, enabled: bool) -> Result<&AlertRule> {
        if !self.rules.set_enabled(id, enabled) {
            return Err(AlertError::RuleNotFound(id.to_string()));
        }
        tracing::info!(rule_id = %id, enabled, "Alert rule toggled");
        self.get_rule(id)
    }

    /// Evaluates every enabled rule against `current` using the wall clock.
    pub fn evaluate(
        &mut self,
        current: &CurrentMetrics,
        historical: Option<&HistoricalMetrics>,
    ) -> Vec<AlertEvent> {
        self.evaluate_at(Utc::now(), current, historical)
    }

    /// Evaluates every enabled rule in store order as of `now`.
    ///
    /// Fired events are dispatched to the notification channels as they
    /// fire, then appended to the event log together and returned in rule
    /// order. A rule is skipped when it is cooling down, when its metric is
    /// missing or non-finite, or when its condition does not hold.
    pub fn evaluate_at(
        &mut self,
        now: DateTime<Utc>,
        current: &CurrentMetrics,
        historical: Option<&HistoricalMetrics>,
    ) -> Vec<AlertEvent> {
        let mut fired: Vec<AlertEvent> = Vec::new();

        for rule in self.rules.iter_mut() {
            if !rule.enabled {
                continue;
            }

            let cooling_down = rule.last_triggered.is_some_and(|last| {
                now - last < Duration::minutes(i64::from(rule.cooldown_minutes))
            });
            if cooling_down {
                tracing::debug!(rule_id = %rule.id, "Alert suppressed (cooldown)");
                continue;
            }

            let value = match current.get(&rule.metric) {
                Some(v) if v.is_finite() => *v,
                Some(_) => {
                    tracing::debug!(rule_id = %rule.id, metric = %rule.metric, "Non-finite metric value, skipping");
                    continue;
                }
                None => continue,
            };

            let history = historical
                .and_then(|h| h.get(&rule.metric))
                .map(Vec::as_slice);

            let Some(trigger) = rules::evaluate(rule, value, history) else {
                continue;
            };

            let event = AlertEvent {
                id: unique_event_id(&rule.id, now, &self.events, &fired),
                rule_id: rule.id.clone(),
                triggered_at: now,
                metric_value: value,
                threshold_value: rule.threshold,
                severity: rule.severity,
                message: rules::render_message(rule, &trigger),
                acknowledged: false,
                resolved: false,
            };
            rule.last_triggered = Some(now);

            tracing::info!(
                rule_id = %rule.id,
                event_id = %event.id,
                severity = %event.severity,
                "Alert triggered: {}",
                event.message
            );

            let report = self.notifier.dispatch(&event, rule);
            if !report.is_clean() {
                tracing::warn!(
                    event_id = %event.id,
                    failures = report.failures.len(),
                    "Some notifications failed"
                );
            }

            fired.push(event);
        }

        self.events.append(fired.iter().cloned());
        fired
    }

    pub fn get_event(&self, id: &str) -> Result<&AlertEvent> {
        self.events
            .get(id)
            .ok_or_else(|| AlertError::EventNotFound(id.to_string()))
    }

    pub fn active_events(&self) -> Vec<&AlertEvent> {
        self.events.active()
    }

    pub fn acknowledge(&mut self, event_id: &str) -> Result<&AlertEvent> {
        if !self.events.acknowledge(event_id) {
            return Err(AlertError::EventNotFound(event_id.to_string()));
        }
        tracing::info!(event_id, "Alert acknowledged");
        self.get_event(event_id)
    }

    pub fn resolve(&mut self, event_id: &str) -> Result<&AlertEvent> {
        if !self.events.resolve(event_id) {
            return Err(AlertError::EventNotFound(event_id.to_string()));
        }
        tracing::info!(event_id, "Alert resolved");
        self.get_event(event_id)
    }

    pub fn summary(&self) -> AlertSummary {
        summary::summarize(&self.rules, &self.events, Utc::now())
    }

    pub fn export(&self) -> AlertExport {
        summary::export(&self.rules, &self.events, Utc::now())
    }
}

/// Checks the fields evaluation relies on.
pub fn validate_rule(rule: &AlertRule) -> Result<()> {
    if rule.id.trim().is_empty() {
        return Err(AlertError::InvalidRule("id must not be empty".to_string()));
    }
    if rule.metric.trim().is_empty() {
        return Err(AlertError::InvalidRule(format!(
            "rule '{}' has an empty metric name",
            rule.id
        )));
    }
    if !rule.threshold.is_finite() {
        return Err(AlertError::InvalidRule(format!(
            "rule '{}' has a non-finite threshold",
            rule.id
        )));
    }
    Ok(())
}

/// `<rule_id>_<YYYYmmdd_HHMMSS>`, with `_<n>` appended when that id is
/// already taken by a logged event or an earlier fire in the same pass.
fn unique_event_id(
    rule_id: &str,
    now: DateTime<Utc>,
    log: &EventLog,
    pending: &[AlertEvent],
) -> String {
    let base = format!("{}_{}", rule_id, now.format("%Y%m%d_%H%M%S"));
    let taken = |id: &str| log.contains_id(id) || pending.iter().any(|e| e.id == id);

    if !taken(&base) {
        return base;
    }
    let mut n = 2u32;
    loop {
        let candidate = format!("{base}_{n}");
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
