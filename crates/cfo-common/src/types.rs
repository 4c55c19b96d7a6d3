use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current metric values keyed by metric name (e.g. `cash_runway_months`).
pub type CurrentMetrics = HashMap<String, f64>;

/// Prior values per metric, oldest first and most recent last.
pub type HistoricalMetrics = HashMap<String, Vec<f64>>;

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use cfo_common::types::Severity;
///
/// let sev: Severity = "high".parse().unwrap();
/// assert_eq!(sev, Severity::High);
/// assert_eq!(sev.to_string(), "high");
/// assert!(Severity::Critical > Severity::Low);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// How a rule compares the current metric value against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Fires when the value is strictly below the threshold.
    Below,
    /// Fires when the value is strictly above the threshold.
    Above,
    /// Fires when the value is within 0.01 of the threshold.
    Equals,
    /// Fires when the change from the most recent historical value, in
    /// percent, is at or below the threshold (negative = decline).
    ChangePercent,
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Below => write!(f, "below"),
            Condition::Above => write!(f, "above"),
            Condition::Equals => write!(f, "equals"),
            Condition::ChangePercent => write!(f, "change_percent"),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cooldown_minutes() -> u32 {
    60
}

/// A threshold rule evaluated against one named metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertRule {
    /// Unique rule identifier (e.g. `runway_critical`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Target metric name
    pub metric: String,
    pub condition: Condition,
    pub threshold: f64,
    pub severity: Severity,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub email_enabled: bool,
    #[serde(default = "default_true")]
    pub push_enabled: bool,
    /// Minimum minutes between two fires of this rule
    #[serde(default = "default_cooldown_minutes")]
    pub cooldown_minutes: u32,
    /// When the rule last fired; `None` until the first fire
    #[serde(default)]
    pub last_triggered: Option<DateTime<Utc>>,
}

impl AlertRule {
    /// Creates an enabled rule with both channels on and a 60 minute cooldown.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        metric: impl Into<String>,
        condition: Condition,
        threshold: f64,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metric: metric.into(),
            condition,
            threshold,
            severity,
            enabled: true,
            email_enabled: true,
            push_enabled: true,
            cooldown_minutes: default_cooldown_minutes(),
            last_triggered: None,
        }
    }

    pub fn with_cooldown_minutes(mut self, minutes: u32) -> Self {
        self.cooldown_minutes = minutes;
        self
    }
}

/// A single fire of an [`AlertRule`].
///
/// `severity` is copied from the rule at fire time and is not updated when
/// the rule changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertEvent {
    pub id: String,
    /// Back-reference to the originating rule (lookup only)
    pub rule_id: String,
    pub triggered_at: DateTime<Utc>,
    /// Metric value that caused the fire
    pub metric_value: f64,
    /// Rule threshold at fire time
    pub threshold_value: f64,
    pub severity: Severity,
    pub message: String,
    pub acknowledged: bool,
    pub resolved: bool,
}

/// Active event counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SeverityBreakdown {
    pub critical: u64,
    pub high: u64,
    pub medium: u64,
    pub low: u64,
}

impl SeverityBreakdown {
    pub fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
        }
    }
}

/// Point-in-time aggregate over the rule store and the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertSummary {
    pub total_rules: u64,
    pub enabled_rules: u64,
    pub total_events: u64,
    /// Events not yet resolved
    pub active_events: u64,
    /// Acknowledged but not resolved
    pub acknowledged_events: u64,
    pub resolved_events: u64,
    /// Active events partitioned by severity
    pub severity_breakdown: SeverityBreakdown,
    pub last_check: DateTime<Utc>,
}

/// Full dump of rules, events and the summary.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlertExport {
    pub rules: Vec<AlertRule>,
    pub events: Vec<AlertEvent>,
    pub summary: AlertSummary,
    pub exported_at: DateTime<Utc>,
}

// ---- HTTP request payloads ----

#[derive(Debug, Clone, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CheckMetricsRequest {
    #[serde(default)]
    pub current_metrics: HashMap<String, f64>,
    #[serde(default)]
    pub historical_metrics: Option<HashMap<String, Vec<f64>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SetRuleEnabledRequest {
    pub enabled: bool,
}
