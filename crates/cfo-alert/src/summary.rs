use crate::event_log::EventLog;
use crate::store::RuleStore;
use cfo_common::types::{AlertExport, AlertSummary, SeverityBreakdown};
use chrono::{DateTime, Utc};

/// Aggregates rule and event counts as of `now`.
pub fn summarize(rules: &RuleStore, log: &EventLog, now: DateTime<Utc>) -> AlertSummary {
    let mut active_events = 0u64;
    let mut acknowledged_events = 0u64;
    let mut resolved_events = 0u64;
    let mut severity_breakdown = SeverityBreakdown::default();

    for event in log.all() {
        if event.resolved {
            resolved_events += 1;
            continue;
        }
        active_events += 1;
        severity_breakdown.increment(event.severity);
        if event.acknowledged {
            acknowledged_events += 1;
        }
    }

    AlertSummary {
        total_rules: rules.len() as u64,
        enabled_rules: rules.enabled_count() as u64,
        total_events: log.len() as u64,
        active_events,
        acknowledged_events,
        resolved_events,
        severity_breakdown,
        last_check: now,
    }
}

/// Snapshot of all rules, all events and the summary.
pub fn export(rules: &RuleStore, log: &EventLog, now: DateTime<Utc>) -> AlertExport {
    AlertExport {
        rules: rules.rules().to_vec(),
        events: log.all().to_vec(),
        summary: summarize(rules, log, now),
        exported_at: now,
    }
}
